use std::collections::HashSet;
use std::sync::Arc;

use catalog_core::Product;
use thiserror::Error;

/// Seed for locally generated ids. The first created product gets `1001`
/// unless the fetched catalog pushed the counter higher.
pub const INITIAL_CUSTOM_ID: u64 = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

impl std::fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStatus::Idle => write!(f, "idle"),
            FetchStatus::Loading => write!(f, "loading"),
            FetchStatus::Ready => write!(f, "ready"),
            FetchStatus::Error => write!(f, "error"),
        }
    }
}

/// An immutable snapshot of the store.
///
/// Collections sit behind `Arc` so a transition that does not touch a field
/// hands the same allocation to the next snapshot; `Arc::ptr_eq` tells an
/// observer whether a field changed.
#[derive(Debug, Clone)]
pub struct StoreState {
    /// Local creations newest-first, fetched records in API order.
    pub products: Arc<Vec<Product>>,
    pub favorite_ids: Arc<HashSet<u64>>,
    pub status: FetchStatus,
    /// Message of the last failed fetch. Cleared when a fetch starts.
    pub error: Option<String>,
    /// Highest id handed out so far, local or fetched.
    pub next_custom_id: u64,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            products: Arc::new(Vec::new()),
            favorite_ids: Arc::new(HashSet::new()),
            status: FetchStatus::Idle,
            error: None,
            next_custom_id: INITIAL_CUSTOM_ID,
        }
    }
}

impl StoreState {
    #[must_use]
    pub fn product(&self, id: u64) -> Option<&Product> {
        catalog_core::find_product(&self.products, id)
    }

    #[must_use]
    pub fn is_favorite(&self, id: u64) -> bool {
        self.favorite_ids.contains(&id)
    }
}

/// A failed catalog fetch, reduced to the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchFailure {
    message: String,
}

impl FetchFailure {
    /// Shown when the underlying error carries no message of its own.
    pub const GENERIC_MESSAGE: &'static str = "Something went wrong while loading products";

    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            return Self {
                message: Self::GENERIC_MESSAGE.to_owned(),
            };
        }
        Self { message }
    }

    pub fn from_error(err: &dyn std::error::Error) -> Self {
        Self::new(err.to_string())
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
