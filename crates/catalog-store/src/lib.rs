//! Session-scoped product store.
//!
//! All state is volatile: products created, edited or deleted here are a
//! local overlay on the fetched catalog and are never written back to the
//! remote source.

pub mod reducer;
mod source;
mod state;
mod store;

pub use source::CatalogSource;
pub use state::{FetchFailure, FetchStatus, StoreState, INITIAL_CUSTOM_ID};
pub use store::ProductStore;
