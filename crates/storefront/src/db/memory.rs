//! In-memory storage backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KvStore, StorageError};

/// In-memory [`KvStore`] used by tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self.values.read().await;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut guard = self.values.write().await;
        guard.insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self.values.write().await;
        guard.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStore::default();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v".to_owned()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_owned()));

        store.set("k", "v2".to_owned()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v2".to_owned()));

        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
