//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Session management (login, registration, logout)
//! - `wishlist` - Per-user wishlist reads and toggles

pub mod auth;
pub mod wishlist;

pub use auth::AuthService;
pub use wishlist::WishlistService;
