//! Product domain types.
//!
//! These types provide a clean, ergonomic shape separate from the raw
//! upstream catalog records. JSON field names follow the storefront's
//! camelCase convention so values round-trip through local storage
//! unchanged.

use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;

/// Aggregate product rating.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    /// Average rating in [0, 5], rounded to two decimal places.
    pub rate: f64,
    /// Number of reviews behind the average.
    pub count: u32,
}

/// Physical product dimensions, when the source reports them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in source units.
    pub width: Option<f64>,
    /// Height in source units.
    pub height: Option<f64>,
    /// Depth in source units.
    pub depth: Option<f64>,
}

/// A single customer review carried through from the source record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Star rating given by the reviewer.
    pub rating: Option<f64>,
    /// Free-text comment.
    pub comment: Option<String>,
    /// Review date as reported upstream (ISO 8601 string).
    pub date: Option<String>,
    /// Display name of the reviewer.
    pub reviewer_name: Option<String>,
    /// Email of the reviewer.
    pub reviewer_email: Option<String>,
}

/// A catalog product after mapping from the raw upstream record.
///
/// Invariants upheld by the mapping layer: `price >= 0` and
/// `rating.rate` in [0, 5].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable identifier from the source data.
    pub id: ProductId,
    /// Synthesized display title.
    pub title: String,
    /// Shortened description with the house suffix sentence.
    pub description: String,
    /// Price in whole currency units, 80% of the source price.
    pub price: i64,
    /// Always the storefront's single domain category.
    pub category: String,
    /// Primary image URL (thumbnail, else first image, else empty).
    pub image: String,
    /// Aggregate rating.
    pub rating: Rating,
    /// Upstream discount percentage, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    /// Units in stock, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    /// Brand name (upstream value, else synthesized).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Thumbnail URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Gallery image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Physical dimensions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    /// Warranty text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warranty_information: Option<String>,
    /// Shipping text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_information: Option<String>,
    /// Upstream tag set, used by the client-side tag filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Customer reviews in upstream order.
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// One fetched page of products, mirroring the upstream pagination
/// envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    /// Mapped products in upstream order.
    pub products: Vec<Product>,
    /// Total matching records upstream.
    pub total: u64,
    /// Offset of this page into the upstream collection.
    pub skip: u64,
    /// Page size used for this fetch.
    pub limit: u64,
}

impl ProductPage {
    /// Cursor for the page after this one, or `None` when this page
    /// exhausts the upstream collection.
    #[must_use]
    pub const fn next_skip(&self) -> Option<u64> {
        let next = self.skip + self.limit;
        if next < self.total { Some(next) } else { None }
    }
}

/// Parameters for one upstream page fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageRequest {
    /// Page size.
    pub limit: u64,
    /// Offset into the upstream collection.
    pub skip: u64,
    /// Full-text search query; takes precedence over `category`.
    pub search: Option<String>,
    /// Upstream category slug for server-side filtering.
    pub category: Option<String>,
}
