//! Local persistence for the storefront.
//!
//! Durable state lives in a key-value store of JSON text values, one
//! value per fixed key:
//!
//! - [`USERS_KEY`] - registered users (sequence of `User`)
//! - [`CURRENT_USER_KEY`] - the active session (`User`, absent when logged out)
//! - [`WISHLISTS_KEY`] - wishlists (mapping email -> product ids)
//!
//! The [`KvStore`] trait is the seam between the repositories and the
//! storage medium: [`JsonFileStore`] persists to disk, [`MemoryStore`] is
//! the in-memory fake used by tests. Repositories ([`users`],
//! [`wishlists`]) own the JSON shapes stored under each key; nothing else
//! touches the store directly.

pub mod json_file;
pub mod memory;
pub mod users;
pub mod wishlists;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage key for the registered user collection.
pub const USERS_KEY: &str = "users";

/// Storage key for the active session value.
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Storage key for the email -> product ids wishlist mapping.
pub const WISHLISTS_KEY: &str = "wishlists";

/// Errors that can occur in the key-value store.
///
/// A missing key is never an error; reads yield `None` instead.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying medium failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be serialized for writing.
    #[error("failed to serialize value for key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A stored value could not be parsed back.
    #[error("failed to parse stored value for key '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that can occur in the repositories layered over the store.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The key-value store failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),
}

/// A persistent key-value store of JSON text values.
///
/// Implementations serialize values to text on write and hand the text
/// back on read; a missing key yields `Ok(None)` rather than an error.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read the raw text stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write raw text under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Delete the value under `key`. Removing a missing key is a no-op.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Shared handle to a [`KvStore`] with typed JSON accessors.
///
/// Cheaply cloneable; all clones refer to the same backend.
#[derive(Clone)]
pub struct Store {
    inner: Arc<dyn KvStore>,
}

impl Store {
    /// Wrap a storage backend.
    pub fn new(backend: impl KvStore + 'static) -> Self {
        Self {
            inner: Arc::new(backend),
        }
    }

    /// Create a store over an in-memory backend (tests, previews).
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::default())
    }

    /// Read and parse the JSON value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Corrupt` if the stored text is not valid
    /// JSON for `T`, or an I/O error from the backend.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.inner.get(key).await? {
            Some(text) => {
                let value = serde_json::from_str(&text).map_err(|source| StorageError::Corrupt {
                    key: key.to_owned(),
                    source,
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Serialize `value` as JSON and write it under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialize` if the value cannot be encoded,
    /// or an I/O error from the backend.
    pub async fn set_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let text = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: key.to_owned(),
            source,
        })?;
        self.inner.set(key, text).await
    }

    /// Delete the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error from the backend.
    pub async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let store = Store::in_memory();
        let value: Option<Vec<u32>> = store.get_json("absent").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_json_roundtrip() {
        let store = Store::in_memory();
        store.set_json("nums", &vec![1u32, 2, 3]).await.unwrap();
        let value: Option<Vec<u32>> = store.get_json("nums").await.unwrap();
        assert_eq!(value, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let store = Store::in_memory();
        store.set_json("k", "v").await.unwrap();
        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        let value: Option<String> = store.get_json("k").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_value_is_reported() {
        let backend = MemoryStore::default();
        backend.set("bad", "not json".to_owned()).await.unwrap();
        let store = Store::new(backend);

        let result: Result<Option<Vec<u32>>, _> = store.get_json("bad").await;
        assert!(matches!(result, Err(StorageError::Corrupt { .. })));
    }
}
