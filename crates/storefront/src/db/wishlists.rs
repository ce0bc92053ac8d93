//! Wishlist repository over the local key-value store.
//!
//! Owns the JSON shape under [`WISHLISTS_KEY`]: a mapping from user email
//! to an ordered sequence of product ids. Entries are created lazily on
//! first write and never proactively deleted.

use std::collections::HashMap;

use viorra_core::ProductId;

use super::{RepositoryError, Store, WISHLISTS_KEY};

type WishlistMap = HashMap<String, Vec<ProductId>>;

/// Repository for per-email wishlist storage.
pub struct WishlistRepository<'a> {
    store: &'a Store,
}

impl<'a> WishlistRepository<'a> {
    /// Create a new wishlist repository.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    async fn map(&self) -> Result<WishlistMap, RepositoryError> {
        let map = self.store.get_json::<WishlistMap>(WISHLISTS_KEY).await?;
        Ok(map.unwrap_or_default())
    }

    /// The wishlist recorded for `email`, empty when none exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the store fails. An unknown
    /// email is not an error.
    pub async fn get(&self, email: &str) -> Result<Vec<ProductId>, RepositoryError> {
        let mut map = self.map().await?;
        Ok(map.remove(email).unwrap_or_default())
    }

    /// Replace the wishlist recorded for `email`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the store fails.
    pub async fn set(&self, email: &str, ids: Vec<ProductId>) -> Result<(), RepositoryError> {
        let mut map = self.map().await?;
        map.insert(email.to_owned(), ids);
        Ok(self.store.set_json(WISHLISTS_KEY, &map).await?)
    }
}
