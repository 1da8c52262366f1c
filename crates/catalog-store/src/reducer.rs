//! Pure state transitions.
//!
//! Each function takes the current snapshot and returns the next one without
//! mutating its input. Fields a transition does not touch keep their `Arc`.
//! Functions returning `Option` yield `None` when the transition is a no-op.

use std::collections::HashSet;
use std::sync::Arc;

use catalog_core::{
    placeholder_image, Product, ProductDraft, ProductUpdate, CUSTOM_BRAND, USER_CATEGORY,
};

use crate::state::{FetchFailure, FetchStatus, StoreState};

/// Moves the store into `Loading`, unless a fetch is already running or the
/// catalog is already populated.
#[must_use]
pub fn begin_fetch(state: &StoreState) -> Option<StoreState> {
    if state.status == FetchStatus::Loading || !state.products.is_empty() {
        return None;
    }
    Some(StoreState {
        status: FetchStatus::Loading,
        error: None,
        ..state.clone()
    })
}

/// Installs a freshly normalized catalog.
///
/// `products` and `next_custom_id` change in the same snapshot; the counter
/// never moves backwards.
#[must_use]
pub fn fetch_succeeded(state: &StoreState, products: Vec<Product>) -> StoreState {
    let next_custom_id = products
        .iter()
        .map(|p| p.id)
        .fold(state.next_custom_id, u64::max);

    StoreState {
        products: Arc::new(products),
        status: FetchStatus::Ready,
        error: None,
        next_custom_id,
        favorite_ids: Arc::clone(&state.favorite_ids),
    }
}

/// Records a failed fetch. Products are left as they were.
#[must_use]
pub fn fetch_failed(state: &StoreState, failure: &FetchFailure) -> StoreState {
    StoreState {
        status: FetchStatus::Error,
        error: Some(failure.message().to_owned()),
        ..state.clone()
    }
}

/// Flips `id` in the favorites set. The id need not belong to a product.
#[must_use]
pub fn toggle_favorite(state: &StoreState, id: u64) -> StoreState {
    let mut favorite_ids: HashSet<u64> = (*state.favorite_ids).clone();
    if !favorite_ids.remove(&id) {
        favorite_ids.insert(id);
    }
    StoreState {
        favorite_ids: Arc::new(favorite_ids),
        ..state.clone()
    }
}

/// Drops `id` from the products and from the favorites.
#[must_use]
pub fn remove_product(state: &StoreState, id: u64) -> Option<StoreState> {
    let listed = state.products.iter().any(|p| p.id == id);
    let favorite = state.favorite_ids.contains(&id);
    if !listed && !favorite {
        return None;
    }

    let products = if listed {
        Arc::new(
            state
                .products
                .iter()
                .filter(|p| p.id != id)
                .cloned()
                .collect(),
        )
    } else {
        Arc::clone(&state.products)
    };

    let favorite_ids = if favorite {
        let mut ids = (*state.favorite_ids).clone();
        ids.remove(&id);
        Arc::new(ids)
    } else {
        Arc::clone(&state.favorite_ids)
    };

    Some(StoreState {
        products,
        favorite_ids,
        ..state.clone()
    })
}

/// Creates a local product from `draft` and prepends it.
///
/// The draft is not validated here; see [`catalog_core::validate_draft`].
/// Returns `None` only when the id counter is already at `u64::MAX`, which a
/// normalized catalog cannot reach.
#[must_use]
pub fn create_product(state: &StoreState, draft: ProductDraft) -> Option<(StoreState, Product)> {
    let id = state.next_custom_id.checked_add(1)?;
    let title = draft.title.trim().to_owned();

    let category = match draft.category.trim() {
        "" => USER_CATEGORY.to_owned(),
        c => c.to_owned(),
    };

    let thumbnail = draft
        .image_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map_or_else(|| placeholder_image(&format!("{title}-{id}")), str::to_owned);

    let product = Product {
        id,
        description: draft.description.trim().to_owned(),
        price: draft.price,
        category,
        brand: Some(CUSTOM_BRAND.to_owned()),
        rating: Some(0.0),
        stock: Some(0),
        images: vec![thumbnail.clone()],
        thumbnail,
        title,
        is_user_created: true,
    };

    let mut products = Vec::with_capacity(state.products.len() + 1);
    products.push(product.clone());
    products.extend(state.products.iter().cloned());

    let status = match state.status {
        FetchStatus::Idle => FetchStatus::Ready,
        other => other,
    };

    let next = StoreState {
        products: Arc::new(products),
        next_custom_id: id,
        status,
        ..state.clone()
    };
    Some((next, product))
}

/// Applies `update` to the product with `id`.
///
/// Provided strings are trimmed and replace the current value. A non-blank
/// `image_url` becomes the thumbnail and moves to the front of `images`.
/// Returns `None` when no product has `id`.
#[must_use]
pub fn update_product(
    state: &StoreState,
    id: u64,
    update: ProductUpdate,
) -> Option<(StoreState, Product)> {
    let idx = state.products.iter().position(|p| p.id == id)?;
    let mut product = state.products[idx].clone();

    if let Some(title) = update.title {
        product.title = title.trim().to_owned();
    }
    if let Some(description) = update.description {
        product.description = description.trim().to_owned();
    }
    if let Some(price) = update.price {
        product.price = price;
    }
    if let Some(category) = update.category {
        product.category = category.trim().to_owned();
    }

    let image = update
        .image_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty());
    if let Some(image) = image {
        let mut images = Vec::with_capacity(product.images.len() + 1);
        images.push(image.to_owned());
        images.extend(product.images.iter().filter(|i| *i != image).cloned());
        product.thumbnail = image.to_owned();
        product.images = images;
    }

    let mut products = (*state.products).clone();
    products[idx] = product.clone();

    let next = StoreState {
        products: Arc::new(products),
        ..state.clone()
    };
    Some((next, product))
}

#[cfg(test)]
#[path = "reducer_test.rs"]
mod tests;
