use catalog_core::{Product, ProductDraft, ProductUpdate};
use tokio::sync::watch;

use crate::reducer;
use crate::source::CatalogSource;
use crate::state::StoreState;

/// The product store: one writer, any number of observers.
///
/// Every operation replaces the whole [`StoreState`] in one step through a
/// `watch` channel, so observers only ever see complete snapshots. Share it
/// by handle (`Arc<ProductStore<_>>`); there is no global instance.
pub struct ProductStore<S> {
    source: S,
    state: watch::Sender<StoreState>,
}

impl<S: CatalogSource> ProductStore<S> {
    /// Creates an empty, idle store reading from `source`.
    pub fn new(source: S) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self { source, state }
    }

    /// The current snapshot. Cheap: collections are shared, not copied.
    #[must_use]
    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    /// Observes every state replacement from now on.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    /// Loads the catalog once per session.
    ///
    /// Does nothing while a fetch is in flight or once products exist. A
    /// failure is recorded in the state (`Error` plus message) rather than
    /// returned; calling again while the catalog is still empty retries.
    pub async fn fetch_products(&self) {
        let started = self.state.send_if_modified(|current| match reducer::begin_fetch(current) {
            Some(next) => {
                *current = next;
                true
            }
            None => false,
        });
        if !started {
            tracing::debug!("catalog fetch skipped: already loading or populated");
            return;
        }

        tracing::info!("fetching catalog");
        let outcome = self.source.load().await;

        self.state.send_modify(|current| {
            *current = match outcome {
                Ok(records) => {
                    let products = catalog_client::normalize_catalog(records);
                    tracing::info!(products = products.len(), "catalog loaded");
                    reducer::fetch_succeeded(current, products)
                }
                Err(failure) => {
                    tracing::warn!(error = %failure, "catalog unavailable");
                    reducer::fetch_failed(current, &failure)
                }
            };
        });
    }

    pub fn toggle_favorite(&self, id: u64) {
        self.state
            .send_modify(|current| *current = reducer::toggle_favorite(current, id));
    }

    /// Removes `id` from products and favorites; unknown ids are ignored.
    pub fn remove_product(&self, id: u64) {
        let removed = self.state.send_if_modified(|current| {
            match reducer::remove_product(current, id) {
                Some(next) => {
                    *current = next;
                    true
                }
                None => false,
            }
        });
        if removed {
            tracing::debug!(id, "product removed");
        }
    }

    /// Creates a local product and returns it. Validate the draft first with
    /// [`catalog_core::validate_draft`].
    ///
    /// Returns `None`, leaving the state untouched, only if the id counter is
    /// exhausted.
    pub fn create_product(&self, draft: ProductDraft) -> Option<Product> {
        let mut created = None;
        self.state.send_if_modified(|current| {
            match reducer::create_product(current, draft) {
                Some((next, product)) => {
                    *current = next;
                    created = Some(product);
                    true
                }
                None => false,
            }
        });
        match &created {
            Some(product) => tracing::debug!(id = product.id, "product created"),
            None => tracing::warn!("product not created: id counter exhausted"),
        }
        created
    }

    /// Applies `update` to `id`, returning the updated product, or `None` if
    /// no product has that id.
    pub fn update_product(&self, id: u64, update: ProductUpdate) -> Option<Product> {
        let mut updated = None;
        self.state.send_if_modified(|current| {
            match reducer::update_product(current, id, update) {
                Some((next, product)) => {
                    *current = next;
                    updated = Some(product);
                    true
                }
                None => false,
            }
        });
        updated
    }
}
