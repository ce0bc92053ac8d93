//! Raw wire types for the upstream catalog API.
//!
//! These mirror the upstream JSON loosely: everything is optional, and
//! the conversion layer decides what is required. They never escape the
//! catalog module.

use serde::Deserialize;

/// Raw pagination envelope from the listing endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProductPage {
    #[serde(default)]
    pub products: Vec<RawProduct>,
    pub total: Option<u64>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

/// A raw upstream product record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub stock: Option<f64>,
    pub brand: Option<String>,
    pub thumbnail: Option<String>,
    pub images: Option<Vec<String>>,
    pub discount_percentage: Option<f64>,
    pub dimensions: Option<RawDimensions>,
    pub warranty_information: Option<String>,
    pub shipping_information: Option<String>,
    pub tags: Option<Vec<String>>,
    pub reviews: Option<Vec<RawReview>>,
}

/// Raw physical dimensions.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RawDimensions {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub depth: Option<f64>,
}

/// A raw customer review.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReview {
    pub rating: Option<f64>,
    pub comment: Option<String>,
    pub date: Option<String>,
    pub reviewer_name: Option<String>,
    pub reviewer_email: Option<String>,
}
