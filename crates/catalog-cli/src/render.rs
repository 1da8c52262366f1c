//! Plain-text views over a store snapshot.
//!
//! Each view returns the full text to print, trailing newline included, so
//! the one-shot commands and the session share the same output.

use catalog_core::{categories, CatalogQuery, Product};
use catalog_store::{FetchFailure, FetchStatus, StoreState};

const TITLE_WIDTH: usize = 50;

/// Header, state card and one page of products.
pub(crate) fn list_view(state: &StoreState, query: &CatalogQuery) -> String {
    let mut lines = vec![format!(
        "Products  total: {}  favorites: {}",
        state.products.len(),
        state.favorite_ids.len()
    )];

    let page = query.run(&state.products, &state.favorite_ids);

    let show_loader = state.status == FetchStatus::Loading && state.products.is_empty();
    let show_empty = !show_loader
        && state.status != FetchStatus::Error
        && page.total_matches == 0
        && (state.status == FetchStatus::Ready || !state.products.is_empty());

    if show_loader {
        lines.push("Loading products...".to_owned());
    }
    if state.status == FetchStatus::Error && !show_loader {
        lines.push(error_text(state));
        lines.push("Type `retry` to try again.".to_owned());
    }
    if show_empty {
        lines.push("Nothing to show. Try changing the filters.".to_owned());
    }

    for product in &page.items {
        lines.push(product_row(product, state.is_favorite(product.id)));
    }

    if page.total_pages > 1 {
        lines.push(format!("Page {} / {}", page.current_page, page.total_pages));
    }

    finish(lines)
}

/// Full details for one product, or the matching loading/error/missing card.
pub(crate) fn detail_view(state: &StoreState, id: u64) -> String {
    let Some(product) = state.product(id) else {
        let lines = match state.status {
            FetchStatus::Loading => vec!["Loading product...".to_owned()],
            FetchStatus::Error => vec![error_text(state), "Type `retry` to try again.".to_owned()],
            FetchStatus::Idle | FetchStatus::Ready => {
                vec!["Product not found or already removed.".to_owned()]
            }
        };
        return finish(lines);
    };

    let mut badges = vec![format!("${:.2}", product.price), product.category.clone()];
    if let Some(brand) = &product.brand {
        badges.push(brand.clone());
    }
    if let Some(rating) = product.rating {
        badges.push(format!("\u{2605} {rating:.1}"));
    }

    let mut lines = vec![
        format!("#{}{}", product.id, if product.is_user_created { " (local)" } else { "" }),
        product.title.clone(),
        product.description.clone(),
        badges.join(" | "),
    ];
    if let Some(stock) = product.stock {
        lines.push(format!("stock: {stock}"));
    }
    lines.push(format!(
        "favorite: {}",
        if state.is_favorite(product.id) { "yes" } else { "no" }
    ));
    lines.push(format!("thumbnail: {}", product.thumbnail));
    if product.images.len() > 1 {
        lines.push("images:".to_owned());
        lines.extend(product.images.iter().map(|src| format!("  {src}")));
    }

    finish(lines)
}

pub(crate) fn categories_view(state: &StoreState) -> String {
    let names = categories(&state.products);
    if names.is_empty() {
        return finish(vec!["No categories.".to_owned()]);
    }
    finish(names)
}

pub(crate) fn stats_view(state: &StoreState) -> String {
    let local = state.products.iter().filter(|p| p.is_user_created).count();
    finish(vec![
        format!("status: {}", state.status),
        format!("products: {} ({local} local)", state.products.len()),
        format!("favorites: {}", state.favorite_ids.len()),
        format!("last assigned id: {}", state.next_custom_id),
    ])
}

fn error_text(state: &StoreState) -> String {
    state
        .error
        .clone()
        .unwrap_or_else(|| FetchFailure::GENERIC_MESSAGE.to_owned())
}

fn product_row(product: &Product, liked: bool) -> String {
    let title = if product.title.chars().count() > TITLE_WIDTH {
        format!("{}...", product.title.chars().take(TITLE_WIDTH).collect::<String>())
    } else {
        product.title.clone()
    };
    format!(
        "{} #{:<6}{:<54}${:<10.2}{}",
        if liked { "\u{2665}" } else { " " },
        product.id,
        title,
        product.price,
        product.category
    )
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
