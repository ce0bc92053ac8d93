//! Viorra Core - Shared types library.
//!
//! This crate provides common types used across the Viorra storefront
//! components:
//! - `storefront` - Catalog client, product feed, session and wishlist services
//! - `integration-tests` - End-to-end tests over the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs and emails, product and filter types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
