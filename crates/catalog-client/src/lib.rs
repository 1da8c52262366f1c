pub mod client;
pub mod error;
pub mod normalize;
mod retry;
pub mod types;

pub use client::{CatalogClient, ClientSettings};
pub use error::ClientError;
pub use normalize::{normalize_catalog, normalize_product};
pub use types::{records_from_payload, RawProduct};
