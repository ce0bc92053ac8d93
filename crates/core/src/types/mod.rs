//! Core types for Viorra.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod filters;
pub mod id;
pub mod product;

pub use email::{Email, EmailError};
pub use filters::{DEFAULT_PAGE_LIMIT, ProductFilters, SortOption};
pub use id::*;
pub use product::{Dimensions, PageRequest, Product, ProductPage, Rating, Review};
