//! Integration tests for the Viorra storefront.
//!
//! Unlike the per-module unit tests, these exercise whole flows across
//! crate seams: registration through session persistence on disk,
//! wishlist toggles surviving a store reopen, and the product feed
//! driving a catalog source.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p viorra-integration-tests
//!
//! # Include the tests that hit the live demo catalog:
//! cargo test -p viorra-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `auth_flow` - Registration, login, and session persistence
//! - `wishlist_flow` - Wishlist toggles and product resolution
//! - `product_feed` - Pagination, filtering, and live catalog mapping

use std::path::Path;

use viorra_storefront::config::Config;
use viorra_storefront::db::{JsonFileStore, Store};

/// Configuration pointing the local store at `data_dir`.
#[must_use]
pub fn test_config(data_dir: &Path) -> Config {
    Config {
        data_dir: data_dir.to_path_buf(),
        ..Config::default()
    }
}

/// Open a file-backed store rooted at `dir`.
///
/// # Panics
///
/// Panics if the directory cannot be created; tests have no recovery
/// path for that.
pub async fn open_store(dir: &Path) -> Store {
    let backend = JsonFileStore::open(dir)
        .await
        .expect("failed to open file store");
    Store::new(backend)
}
