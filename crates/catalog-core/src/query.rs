//! Client-side search, filtering and pagination over a product snapshot.
//!
//! Everything here is a pure function of the products and favorites passed
//! in; the store never reorders its list to satisfy a query.

use std::collections::HashSet;

use crate::products::Product;

/// Page sizes offered by the list view.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 30, 40];

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    All,
    Favorites,
}

/// What the list view is currently asking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub mode: FilterMode,
    /// Free-text search; trimmed and lowercased before matching.
    pub search: String,
    /// Exact category to keep. `None` keeps all categories.
    pub category: Option<String>,
    /// 1-based page number. Clamped into range when the page is built.
    pub page: usize,
    pub page_size: usize,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            mode: FilterMode::All,
            search: String::new(),
            category: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of query results.
#[derive(Debug, PartialEq)]
pub struct CatalogPage<'a> {
    pub items: Vec<&'a Product>,
    /// Number of products matching the query across all pages.
    pub total_matches: usize,
    pub current_page: usize,
    pub total_pages: usize,
}

impl CatalogQuery {
    /// Filters `products` and slices out the requested page.
    ///
    /// `total_pages` is never below 1, and the requested page is clamped into
    /// `1..=total_pages` so a page that shrank away shows its last page instead.
    #[must_use]
    pub fn run<'a>(&self, products: &'a [Product], favorites: &HashSet<u64>) -> CatalogPage<'a> {
        let matches = filter_products(products, favorites, self);
        let page_size = self.page_size.max(1);
        let total_matches = matches.len();
        let total_pages = total_matches.div_ceil(page_size).max(1);
        let current_page = self.page.clamp(1, total_pages);

        let items = matches
            .into_iter()
            .skip((current_page - 1) * page_size)
            .take(page_size)
            .collect();

        CatalogPage {
            items,
            total_matches,
            current_page,
            total_pages,
        }
    }
}

/// Returns the products matching `query`, in store order.
#[must_use]
pub fn filter_products<'a>(
    products: &'a [Product],
    favorites: &HashSet<u64>,
    query: &CatalogQuery,
) -> Vec<&'a Product> {
    let needle = query.search.trim().to_lowercase();

    products
        .iter()
        .filter(|product| {
            if query.mode == FilterMode::Favorites && !favorites.contains(&product.id) {
                return false;
            }
            if let Some(category) = &query.category {
                if &product.category != category {
                    return false;
                }
            }
            if needle.is_empty() {
                return true;
            }
            format!("{} {}", product.title, product.description)
                .to_lowercase()
                .contains(&needle)
        })
        .collect()
}

/// Distinct non-empty categories, sorted case-insensitively.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out: Vec<String> = products
        .iter()
        .filter(|p| !p.category.is_empty())
        .filter(|p| seen.insert(p.category.as_str()))
        .map(|p| p.category.clone())
        .collect();
    out.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
    out
}

#[must_use]
pub fn find_product(products: &[Product], id: u64) -> Option<&Product> {
    products.iter().find(|p| p.id == id)
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
