//! File-backed storage backend.
//!
//! One JSON text file per key under a data directory. Writes land in a
//! temp file first and are renamed into place, so a crash mid-write
//! leaves the previous value intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;

use super::{KvStore, StorageError};

/// [`KvStore`] persisting each key as `<dir>/<key>.json`.
///
/// Keys are the fixed identifiers from [`super`] (`users`, `currentUser`,
/// `wishlists`), so they are always valid file names. An internal lock
/// serializes access; concurrent readers share it.
pub struct JsonFileStore {
    dir: PathBuf,
    lock: RwLock<()>,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            lock: RwLock::new(()),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// The data directory this store writes to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl KvStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.read().await;
        match fs::read_to_string(self.path_for(key)).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let _guard = self.lock.write().await;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.write().await;
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = JsonFileStore::open(dir.path()).await.unwrap();
            store.set("users", "[]".to_owned()).await.unwrap();
        }

        let store = JsonFileStore::open(dir.path()).await.unwrap();
        assert_eq!(store.get("users").await.unwrap(), Some("[]".to_owned()));
    }

    #[tokio::test]
    async fn test_missing_key_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();

        assert_eq!(store.get("currentUser").await.unwrap(), None);

        store.set("currentUser", "{}".to_owned()).await.unwrap();
        store.remove("currentUser").await.unwrap();
        // removing again is a no-op
        store.remove("currentUser").await.unwrap();
        assert_eq!(store.get("currentUser").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();

        store.set("wishlists", "{\"a\":[1]}".to_owned()).await.unwrap();
        store.set("wishlists", "{\"a\":[1,2]}".to_owned()).await.unwrap();
        assert_eq!(
            store.get("wishlists").await.unwrap(),
            Some("{\"a\":[1,2]}".to_owned())
        );
    }
}
