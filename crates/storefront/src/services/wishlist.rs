//! Wishlist service.
//!
//! Thin business layer over [`WishlistRepository`] that serializes
//! concurrent toggles per user. The repository itself does a blind
//! read-modify-write, so two simultaneous toggles for the same email
//! could otherwise lose one of the updates.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::instrument;

use viorra_core::{Email, Product, ProductId};

use crate::catalog::{CatalogError, ProductLookup};
use crate::db::wishlists::WishlistRepository;
use crate::db::{RepositoryError, Store};

/// Errors from wishlist operations.
#[derive(Debug, thiserror::Error)]
pub enum WishlistError {
    /// Storage-layer failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Catalog lookup failure while resolving saved products.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Outcome of a toggle, for callers that surface "added"/"removed" UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Whether the product ended up on the list.
    pub added: bool,
    /// The full list after the toggle, in insertion order.
    pub ids: Vec<ProductId>,
}

/// Service for per-user wishlists.
///
/// Cheap to clone; all clones share the same per-email lock registry,
/// which is what makes the toggle serialization work.
#[derive(Clone)]
pub struct WishlistService {
    store: Store,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl WishlistService {
    /// Create a new wishlist service over `store`.
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self {
            store,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The lock guarding all writes for one email.
    async fn lock_for(&self, email: &Email) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(
            locks
                .entry(email.as_str().to_owned())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    /// Drop the registry entry for `email` once no caller is using it.
    ///
    /// Under the registry lock a strong count of 1 means the map holds
    /// the only reference, so nobody can be waiting on the mutex.
    async fn prune_lock(&self, email: &Email) {
        let mut locks = self.locks.lock().await;
        if let Some(entry) = locks.get(email.as_str())
            && Arc::strong_count(entry) == 1
        {
            locks.remove(email.as_str());
        }
    }

    /// The saved product ids for `email`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `WishlistError::Repository` if the store fails.
    pub async fn wishlist(&self, email: &Email) -> Result<Vec<ProductId>, WishlistError> {
        let repo = WishlistRepository::new(&self.store);
        Ok(repo.get(email.as_str()).await?)
    }

    /// Whether `id` is currently on the wishlist for `email`.
    ///
    /// # Errors
    ///
    /// Returns `WishlistError::Repository` if the store fails.
    pub async fn is_wishlisted(
        &self,
        email: &Email,
        id: ProductId,
    ) -> Result<bool, WishlistError> {
        Ok(self.wishlist(email).await?.contains(&id))
    }

    /// Toggle `id` on the wishlist for `email`.
    ///
    /// Removes the id if present, appends it otherwise. Toggles for the
    /// same email are serialized, so concurrent calls never lose updates;
    /// an even number of toggles of the same id always restores the
    /// original list.
    ///
    /// # Errors
    ///
    /// Returns `WishlistError::Repository` if the store fails.
    #[instrument(skip(self), fields(email = %email, id = %id))]
    pub async fn toggle(
        &self,
        email: &Email,
        id: ProductId,
    ) -> Result<ToggleOutcome, WishlistError> {
        let lock = self.lock_for(email).await;
        let result = {
            let _guard = lock.lock().await;
            self.toggle_locked(email, id).await
        };
        drop(lock);
        self.prune_lock(email).await;
        result
    }

    async fn toggle_locked(
        &self,
        email: &Email,
        id: ProductId,
    ) -> Result<ToggleOutcome, WishlistError> {
        let repo = WishlistRepository::new(&self.store);
        let mut ids = repo.get(email.as_str()).await?;

        let added = if let Some(position) = ids.iter().position(|existing| *existing == id) {
            ids.remove(position);
            false
        } else {
            ids.push(id);
            true
        };

        repo.set(email.as_str(), ids.clone()).await?;
        Ok(ToggleOutcome { added, ids })
    }

    /// Resolve the saved ids into full products, preserving list order.
    ///
    /// Products that have disappeared upstream are skipped rather than
    /// failing the whole list; any other catalog failure is propagated.
    ///
    /// # Errors
    ///
    /// Returns `WishlistError::Repository` if the store fails, or
    /// `WishlistError::Catalog` for catalog failures other than a
    /// missing product.
    #[instrument(skip(self, lookup), fields(email = %email))]
    pub async fn products(
        &self,
        email: &Email,
        lookup: &impl ProductLookup,
    ) -> Result<Vec<Product>, WishlistError> {
        let ids = self.wishlist(email).await?;

        let mut products = Vec::with_capacity(ids.len());
        for id in ids {
            match lookup.fetch_by_id(id).await {
                Ok(product) => products.push(product),
                // delisted upstream; the saved id stays for when it returns
                Err(CatalogError::NotFound(_)) => {}
                Err(error) => return Err(error.into()),
            }
        }
        Ok(products)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    fn email(address: &str) -> Email {
        Email::parse(address).unwrap()
    }

    fn service() -> WishlistService {
        WishlistService::new(Store::in_memory())
    }

    #[tokio::test]
    async fn test_toggle_adds_then_removes() {
        let service = service();
        let user = email("a@example.com");

        let outcome = service.toggle(&user, ProductId::new(5)).await.unwrap();
        assert!(outcome.added);
        assert_eq!(outcome.ids, vec![ProductId::new(5)]);
        assert!(service.is_wishlisted(&user, ProductId::new(5)).await.unwrap());

        let outcome = service.toggle(&user, ProductId::new(5)).await.unwrap();
        assert!(!outcome.added);
        assert!(outcome.ids.is_empty());
        assert!(!service.is_wishlisted(&user, ProductId::new(5)).await.unwrap());
    }

    #[tokio::test]
    async fn test_toggle_preserves_insertion_order() {
        let service = service();
        let user = email("a@example.com");

        service.toggle(&user, ProductId::new(3)).await.unwrap();
        service.toggle(&user, ProductId::new(1)).await.unwrap();
        service.toggle(&user, ProductId::new(2)).await.unwrap();
        // removing from the middle keeps the rest in order
        service.toggle(&user, ProductId::new(1)).await.unwrap();

        assert_eq!(
            service.wishlist(&user).await.unwrap(),
            vec![ProductId::new(3), ProductId::new(2)]
        );
    }

    #[tokio::test]
    async fn test_wishlists_are_per_user() {
        let service = service();
        let alice = email("alice@example.com");
        let bob = email("bob@example.com");

        service.toggle(&alice, ProductId::new(1)).await.unwrap();
        service.toggle(&bob, ProductId::new(2)).await.unwrap();

        assert_eq!(service.wishlist(&alice).await.unwrap(), vec![ProductId::new(1)]);
        assert_eq!(service.wishlist(&bob).await.unwrap(), vec![ProductId::new(2)]);
    }

    #[tokio::test]
    async fn test_lock_registry_is_pruned_after_toggles() {
        let service = service();
        let alice = email("alice@example.com");
        let bob = email("bob@example.com");

        service.toggle(&alice, ProductId::new(1)).await.unwrap();
        service.toggle(&bob, ProductId::new(2)).await.unwrap();
        service.toggle(&alice, ProductId::new(3)).await.unwrap();

        assert!(service.locks.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_toggles_never_lose_updates() {
        let service = service();
        let user = email("a@example.com");

        let mut handles = Vec::new();
        for id in 1..=16 {
            let service = service.clone();
            let user = user.clone();
            handles.push(tokio::spawn(async move {
                service.toggle(&user, ProductId::new(id)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut ids = service.wishlist(&user).await.unwrap();
        ids.sort_unstable();
        assert_eq!(ids, (1..=16).map(ProductId::new).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_even_toggle_count_restores_empty_list() {
        let service = service();
        let user = email("a@example.com");

        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = service.clone();
            let user = user.clone();
            handles.push(tokio::spawn(async move {
                service.toggle(&user, ProductId::new(9)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert!(service.wishlist(&user).await.unwrap().is_empty());
    }

    struct FixedLookup;

    #[async_trait]
    impl ProductLookup for FixedLookup {
        async fn fetch_by_id(&self, id: ProductId) -> Result<Product, CatalogError> {
            if id.as_i64() == 404 {
                return Err(CatalogError::NotFound(format!("product {id}")));
            }
            Ok(Product {
                id,
                title: format!("Product {id}"),
                ..Product::default()
            })
        }
    }

    #[tokio::test]
    async fn test_products_resolves_in_list_order() {
        let service = service();
        let user = email("a@example.com");

        service.toggle(&user, ProductId::new(2)).await.unwrap();
        service.toggle(&user, ProductId::new(1)).await.unwrap();

        let products = service.products(&user, &FixedLookup).await.unwrap();
        let ids: Vec<_> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![ProductId::new(2), ProductId::new(1)]);
    }

    #[tokio::test]
    async fn test_products_skips_delisted_entries() {
        let service = service();
        let user = email("a@example.com");

        service.toggle(&user, ProductId::new(1)).await.unwrap();
        service.toggle(&user, ProductId::new(404)).await.unwrap();
        service.toggle(&user, ProductId::new(2)).await.unwrap();

        let products = service.products(&user, &FixedLookup).await.unwrap();
        let ids: Vec<_> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![ProductId::new(1), ProductId::new(2)]);

        // the saved list itself is untouched
        assert_eq!(service.wishlist(&user).await.unwrap().len(), 3);
    }
}
