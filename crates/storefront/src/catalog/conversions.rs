//! Conversion from raw catalog records into the storefront product shape.
//!
//! The upstream demo catalog carries generic merchandise; the storefront
//! re-skins every record into its own cosmetics line. All derived values
//! are pure functions of the source record, so the same upstream record
//! always maps to the same product.

use viorra_core::{Dimensions, Product, ProductId, Rating, Review};

use super::CatalogError;
use super::types::{RawProduct, RawReview};

/// House brand names, keyed by `id % len`.
const BRANDS: [&str; 7] = [
    "Viorra", "Lumineux", "Roselle", "Aurea", "BelleVie", "Nouveau", "Serein",
];

/// Product name adjectives, keyed by `id % len`.
const ADJECTIVES: [&str; 7] = ["Glow", "Velvet", "Silk", "Radiant", "Luxe", "Pure", "Dew"];

/// Every mapped product lands in this single category.
const CATEGORY: &str = "cosmetics";

/// Suffix sentence appended to every description.
const DESCRIPTION_SUFFIX: &str = "Expertly formulated to enhance natural radiance.";

/// Stand-in when the source record has no description.
const DEFAULT_DESCRIPTION: &str = "A premium cosmetic product for everyday beauty";

/// Source price is missing rarely enough that a fixed stand-in suffices.
const DEFAULT_SOURCE_PRICE: f64 = 100.0;

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::indexing_slicing)]
fn brand_for(id: i64) -> &'static str {
    BRANDS[id.rem_euclid(BRANDS.len() as i64) as usize]
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::indexing_slicing)]
fn adjective_for(id: i64) -> &'static str {
    ADJECTIVES[id.rem_euclid(ADJECTIVES.len() as i64) as usize]
}

/// Synthesized display title: `"{brand} {adjective} {first source word}"`.
fn title_for(id: i64, source_title: Option<&str>) -> String {
    let base = source_title
        .and_then(|t| t.split_whitespace().next())
        .unwrap_or("Serum");
    format!("{} {} {base}", brand_for(id), adjective_for(id))
}

/// First two period-delimited sentences plus the house suffix.
fn description_for(source: Option<&str>) -> String {
    let short = source.map_or_else(
        || DEFAULT_DESCRIPTION.to_owned(),
        |d| {
            d.split('.')
                .take(2)
                .collect::<Vec<_>>()
                .join(".")
                .trim()
                .to_owned()
        },
    );
    format!("{short}. {DESCRIPTION_SUFFIX}")
}

/// 80% of the source price, rounded to the nearest whole unit, never
/// negative.
#[allow(clippy::cast_possible_truncation)]
fn price_for(source_price: Option<f64>) -> i64 {
    let source = source_price
        .filter(|p| p.is_finite())
        .unwrap_or(DEFAULT_SOURCE_PRICE);
    (source * 0.8).round().max(0.0) as i64
}

/// Aggregate rating, clamped to [0, 5] and rounded to two decimals.
///
/// The upstream catalog reports an average but no review count, and may
/// omit the average entirely; both gaps are filled deterministically
/// from the id so repeated fetches agree.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rating_for(id: i64, source_rating: Option<f64>) -> Rating {
    let rate = source_rating
        .filter(|r| r.is_finite())
        .unwrap_or_else(|| 3.0 + (id.rem_euclid(200) as f64) / 100.0);
    let rate = (rate.clamp(0.0, 5.0) * 100.0).round() / 100.0;

    let count = 50 + id.wrapping_mul(37).rem_euclid(200) as u32;

    Rating { rate, count }
}

fn convert_review(raw: RawReview) -> Review {
    Review {
        rating: raw.rating,
        comment: raw.comment,
        date: raw.date,
        reviewer_name: raw.reviewer_name,
        reviewer_email: raw.reviewer_email,
    }
}

/// Map a raw upstream record into the storefront product shape.
///
/// # Errors
///
/// Returns `CatalogError::MissingId` when the record carries no usable
/// id. Identity must be stable for wishlist references, so an id is
/// never invented.
pub fn convert_product(raw: RawProduct) -> Result<Product, CatalogError> {
    let id = raw.id.ok_or(CatalogError::MissingId)?;

    let image = raw
        .thumbnail
        .clone()
        .or_else(|| raw.images.as_ref().and_then(|imgs| imgs.first().cloned()))
        .unwrap_or_default();
    let images = raw.images.unwrap_or_else(|| {
        raw.thumbnail
            .clone()
            .map_or_else(Vec::new, |thumb| vec![thumb])
    });

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let stock = raw
        .stock
        .filter(|s| s.is_finite() && *s > 0.0)
        .map(|s| s as u32);

    Ok(Product {
        id: ProductId::new(id),
        title: title_for(id, raw.title.as_deref()),
        description: description_for(raw.description.as_deref()),
        price: price_for(raw.price),
        category: CATEGORY.to_owned(),
        image,
        rating: rating_for(id, raw.rating),
        discount_percentage: raw.discount_percentage,
        stock,
        brand: raw.brand.or_else(|| Some(brand_for(id).to_owned())),
        thumbnail: raw.thumbnail,
        images,
        dimensions: raw.dimensions.map(|d| Dimensions {
            width: d.width,
            height: d.height,
            depth: d.depth,
        }),
        warranty_information: raw.warranty_information,
        shipping_information: raw.shipping_information,
        tags: raw.tags,
        reviews: raw
            .reviews
            .unwrap_or_default()
            .into_iter()
            .map(convert_review)
            .collect(),
    })
}
