//! Wishlist flows across the service, store, and catalog seams.

use async_trait::async_trait;
use tempfile::TempDir;
use viorra_core::{Email, Product, ProductId};
use viorra_integration_tests::{open_store, test_config};
use viorra_storefront::catalog::{CatalogError, ProductLookup};
use viorra_storefront::services::wishlist::WishlistService;
use viorra_storefront::state::AppState;

fn ada() -> Email {
    Email::parse("ada@example.com").expect("valid email")
}

#[tokio::test]
async fn test_wishlist_survives_restart() {
    let dir = TempDir::new().expect("tempdir");

    {
        let store = open_store(dir.path()).await;
        let wishlist = WishlistService::new(store);
        wishlist.toggle(&ada(), ProductId::new(3)).await.expect("toggle");
        wishlist.toggle(&ada(), ProductId::new(7)).await.expect("toggle");
    }

    let store = open_store(dir.path()).await;
    let wishlist = WishlistService::new(store);
    assert_eq!(
        wishlist.wishlist(&ada()).await.expect("read"),
        vec![ProductId::new(3), ProductId::new(7)]
    );
}

#[tokio::test]
async fn test_double_toggle_restores_previous_state() {
    let dir = TempDir::new().expect("tempdir");
    let store = open_store(dir.path()).await;
    let wishlist = WishlistService::new(store);

    wishlist.toggle(&ada(), ProductId::new(1)).await.expect("toggle");
    let before = wishlist.wishlist(&ada()).await.expect("read");

    wishlist.toggle(&ada(), ProductId::new(9)).await.expect("toggle");
    wishlist.toggle(&ada(), ProductId::new(9)).await.expect("toggle");

    assert_eq!(wishlist.wishlist(&ada()).await.expect("read"), before);
}

/// Lookup that answers from a fixed set of ids.
struct FixtureCatalog;

#[async_trait]
impl ProductLookup for FixtureCatalog {
    async fn fetch_by_id(&self, id: ProductId) -> Result<Product, CatalogError> {
        if id.as_i64() > 100 {
            return Err(CatalogError::NotFound(format!("product {id}")));
        }
        Ok(Product {
            id,
            title: format!("Viorra Glow {id}"),
            ..Product::default()
        })
    }
}

#[tokio::test]
async fn test_saved_ids_resolve_to_products() {
    let dir = TempDir::new().expect("tempdir");
    let store = open_store(dir.path()).await;
    let wishlist = WishlistService::new(store);

    wishlist.toggle(&ada(), ProductId::new(2)).await.expect("toggle");
    wishlist.toggle(&ada(), ProductId::new(999)).await.expect("toggle");
    wishlist.toggle(&ada(), ProductId::new(5)).await.expect("toggle");

    let products = wishlist
        .products(&ada(), &FixtureCatalog)
        .await
        .expect("resolve");

    // the delisted id is skipped, order of the rest is preserved
    let titles: Vec<_> = products.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Viorra Glow 2", "Viorra Glow 5"]);
}

#[tokio::test]
async fn test_app_state_clones_share_the_wishlist() {
    let dir = TempDir::new().expect("tempdir");
    let state = AppState::new(test_config(dir.path()))
        .await
        .expect("state construction");

    let handle_one = state.wishlist();
    let handle_two = state.clone().wishlist();

    handle_one.toggle(&ada(), ProductId::new(4)).await.expect("toggle");
    assert!(handle_two
        .is_wishlisted(&ada(), ProductId::new(4))
        .await
        .expect("read"));
}
