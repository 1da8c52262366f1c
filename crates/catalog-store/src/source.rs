use std::future::Future;

use catalog_client::{CatalogClient, RawProduct};

use crate::state::FetchFailure;

/// Where the store gets its catalog from.
///
/// Implementations return raw records; the store normalizes them. Failures
/// are already reduced to a displayable [`FetchFailure`].
pub trait CatalogSource: Send + Sync {
    fn load(&self) -> impl Future<Output = Result<Vec<RawProduct>, FetchFailure>> + Send;
}

impl CatalogSource for CatalogClient {
    async fn load(&self) -> Result<Vec<RawProduct>, FetchFailure> {
        self.fetch_catalog().await.map_err(|e| {
            tracing::warn!(endpoint = %self.endpoint(), error = %e, "catalog fetch failed");
            FetchFailure::from_error(&e)
        })
    }
}
