//! Upstream product catalog client.
//!
//! # Architecture
//!
//! - Uses `reqwest` for HTTP against the JSON demo catalog API
//! - Upstream is source of truth - NO local sync, direct API calls
//! - In-memory caching via `moka` for API responses (5 minute TTL)
//!
//! Raw upstream records are re-skinned into the storefront's cosmetics
//! line by [`conversions`]; callers only ever see the mapped shape.

mod cache;
mod conversions;
mod types;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use viorra_core::{PageRequest, Product, ProductId, ProductPage};

use crate::config::CatalogConfig;

use cache::CacheValue;
use conversions::convert_product;
use types::RawProductPage;

/// Errors that can occur when talking to the upstream catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Caller asked for an id that can never exist upstream.
    #[error("invalid product id: {0}")]
    InvalidId(i64),

    /// Upstream record carries no id, so it has no stable identity.
    #[error("upstream product record has no id")]
    MissingId,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream returned a non-success status.
    #[error("catalog returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

// =============================================================================
// Source traits
// =============================================================================

/// Anything that can serve a page of products.
///
/// The feed engine consumes this instead of [`CatalogClient`] directly so
/// tests can script responses without a network.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Fetch one page of products.
    async fn fetch_page(&self, request: &PageRequest) -> Result<ProductPage, CatalogError>;
}

/// Anything that can resolve a single product by id.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// Fetch a single product.
    async fn fetch_by_id(&self, id: ProductId) -> Result<Product, CatalogError>;
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the upstream catalog API.
///
/// Non-search pages and by-id lookups are cached for 5 minutes. Search
/// results are never cached so a repeated query always reflects upstream.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<String, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    /// Build an endpoint URL under the configured base.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.inner.base_url.clone();
        // the base is validated as http(s) at config time, so it can
        // always serve as a base
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Resolve the URL for a page fetch.
    ///
    /// A non-empty search takes precedence over a non-empty category;
    /// blank or absent values fall through to the plain paginated
    /// listing.
    fn page_url(&self, request: &PageRequest) -> Url {
        let search = non_blank(request.search.as_deref());
        let category = non_blank(request.category.as_deref());

        let mut url = match (search, category) {
            (Some(query), _) => {
                let mut url = self.endpoint(&["products", "search"]);
                url.query_pairs_mut().append_pair("q", query);
                url
            }
            (None, Some(category)) => self.endpoint(&["products", "category", category]),
            (None, None) => self.endpoint(&["products"]),
        };
        url.query_pairs_mut()
            .append_pair("limit", &request.limit.to_string())
            .append_pair("skip", &request.skip.to_string());
        url
    }

    /// Execute a GET and decode the JSON body.
    ///
    /// A transport failure (connection refused, timeout) is retried once
    /// before being reported; HTTP error statuses are not retried.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let response = match self.inner.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(first) => {
                debug!(error = %first, "catalog request failed, retrying once");
                self.inner.client.get(url).send().await?
            }
        };

        let status = response.status();

        // Read the body as text first for better error diagnostics
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "catalog returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                message: text.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    fn convert_page(request: &PageRequest, raw: RawProductPage) -> ProductPage {
        let mut products = Vec::with_capacity(raw.products.len());
        for record in raw.products {
            match convert_product(record) {
                Ok(product) => products.push(product),
                // a single broken record must not sink the whole page
                Err(error) => warn!(%error, "dropping unmappable catalog record"),
            }
        }

        ProductPage {
            total: raw.total.unwrap_or(products.len() as u64),
            skip: raw.skip.unwrap_or(request.skip),
            limit: raw.limit.unwrap_or(request.limit),
            products,
        }
    }
}

/// Trim a query value, treating blank strings as absent.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[async_trait]
impl ProductSource for CatalogClient {
    /// Fetch one page of products, mapped into the storefront shape.
    ///
    /// Search results bypass the cache; everything else is cached by
    /// category, skip, and limit.
    #[instrument(skip(self))]
    async fn fetch_page(&self, request: &PageRequest) -> Result<ProductPage, CatalogError> {
        let cacheable = non_blank(request.search.as_deref()).is_none();
        let cache_key = format!(
            "page:{}:{}:{}",
            non_blank(request.category.as_deref()).unwrap_or(""),
            request.skip,
            request.limit
        );

        if cacheable
            && let Some(CacheValue::Page(page)) = self.inner.cache.get(&cache_key).await
        {
            debug!("cache hit for product page");
            return Ok(page);
        }

        let raw: RawProductPage = self.get_json(self.page_url(request)).await?;
        let page = Self::convert_page(request, raw);

        if cacheable {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Page(page.clone()))
                .await;
        }

        Ok(page)
    }
}

#[async_trait]
impl ProductLookup for CatalogClient {
    /// Fetch a single product by id.
    #[instrument(skip(self), fields(id = %id))]
    async fn fetch_by_id(&self, id: ProductId) -> Result<Product, CatalogError> {
        if id.as_i64() <= 0 {
            return Err(CatalogError::InvalidId(id.as_i64()));
        }

        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&["products", &id.to_string()]);
        let raw = match self.get_json(url).await {
            Ok(raw) => raw,
            Err(CatalogError::Status { status: 404, .. }) => {
                return Err(CatalogError::NotFound(format!("product {id}")));
            }
            Err(error) => return Err(error),
        };

        let product = convert_product(raw)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }
}
