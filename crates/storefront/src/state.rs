//! Application state shared across the consuming UI layer.

use std::sync::Arc;

use viorra_core::ProductFilters;

use crate::catalog::CatalogClient;
use crate::config::Config;
use crate::db::{JsonFileStore, Store};
use crate::error::AppError;
use crate::feed::ProductFeed;
use crate::feed::debounce::Debouncer;
use crate::services::auth::AuthService;
use crate::services::wishlist::WishlistService;

/// Application state shared across all screens.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the local store and the catalog client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    store: Store,
    catalog: CatalogClient,
    // one instance so every clone shares the per-email toggle locks
    wishlist: WishlistService,
    debouncer: Debouncer,
}

impl AppState {
    /// Create the application state from configuration.
    ///
    /// Opens the on-disk store under `config.data_dir` and builds the
    /// catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the
    /// HTTP client cannot be built.
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let backend = JsonFileStore::open(config.data_dir.clone())
            .await
            .map_err(crate::db::RepositoryError::from)?;
        let store = Store::new(backend);
        let catalog = CatalogClient::new(&config.catalog)?;
        let wishlist = WishlistService::new(store.clone());
        let debouncer = Debouncer::new(config.search_debounce);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                catalog,
                wishlist,
                debouncer,
            }),
        })
    }

    /// State backed by an in-memory store, for tests and previews.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn in_memory(config: Config) -> Result<Self, AppError> {
        let store = Store::in_memory();
        let catalog = CatalogClient::new(&config.catalog)?;
        let wishlist = WishlistService::new(store.clone());
        let debouncer = Debouncer::new(config.search_debounce);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                catalog,
                wishlist,
                debouncer,
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get a reference to the local key-value store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    /// Get a reference to the catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Auth service over the shared store.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(&self.inner.store)
    }

    /// The shared wishlist service.
    #[must_use]
    pub fn wishlist(&self) -> WishlistService {
        self.inner.wishlist.clone()
    }

    /// The shared search debouncer.
    #[must_use]
    pub fn debouncer(&self) -> Debouncer {
        self.inner.debouncer.clone()
    }

    /// A fresh product feed using the configured page size.
    #[must_use]
    pub fn feed(&self) -> ProductFeed {
        ProductFeed::new(ProductFilters {
            limit: self.inner.config.page_limit,
            ..ProductFilters::default()
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use viorra_core::{Email, ProductId};

    use super::*;

    #[tokio::test]
    async fn test_services_share_one_store() {
        let state = AppState::in_memory(Config::default()).unwrap();
        let email = Email::parse("a@example.com").unwrap();

        state
            .wishlist()
            .toggle(&email, ProductId::new(1))
            .await
            .unwrap();

        // a second handle sees the same data
        let ids = state.wishlist().wishlist(&email).await.unwrap();
        assert_eq!(ids, vec![ProductId::new(1)]);
    }

    #[test]
    fn test_feed_uses_configured_page_limit() {
        let config = Config {
            page_limit: 7,
            ..Config::default()
        };
        let state = AppState::in_memory(config).unwrap();
        assert_eq!(state.feed().filters().limit, 7);
    }
}
