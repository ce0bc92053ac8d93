//! Viorra Storefront core library.
//!
//! The deterministic core of the Viorra storefront: a catalog client over
//! a paginated REST source, a filter/sort/paginate product feed, and
//! local-store-backed session and wishlist services. Screens, navigation,
//! and theming live in the consuming application; this crate only exposes
//! the read/write operations they drive.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod feed;
pub mod models;
pub mod services;
pub mod state;
pub mod telemetry;
