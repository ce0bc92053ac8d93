//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults target the public demo catalog.
//!
//! - `VIORRA_CATALOG_BASE_URL` - Catalog API base URL (default: `https://dummyjson.com`)
//! - `VIORRA_CATALOG_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `VIORRA_CATALOG_USER_AGENT` - User-Agent header for catalog requests
//! - `VIORRA_DATA_DIR` - Directory for the local JSON store (default: `./data`)
//! - `VIORRA_SEARCH_DEBOUNCE_MS` - Search quiescence window (default: 350)
//! - `VIORRA_PAGE_LIMIT` - Default catalog page size (default: 20)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default catalog endpoint (DummyJSON demo catalog).
const DEFAULT_CATALOG_BASE_URL: &str = "https://dummyjson.com";

/// Default quiescence window for debounced search input.
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 350;

/// Default User-Agent sent with catalog requests.
const DEFAULT_USER_AGENT: &str = concat!("viorra-storefront/", env!("CARGO_PKG_VERSION"));

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Catalog API configuration
    pub catalog: CatalogConfig,
    /// Directory holding the local JSON key-value store
    pub data_dir: PathBuf,
    /// Quiescence window for debounced search input
    pub search_debounce: Duration,
    /// Default page size for catalog fetches
    pub page_limit: u32,
}

/// Catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the product catalog API
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = parse_base_url(
            "VIORRA_CATALOG_BASE_URL",
            &get_env_or_default("VIORRA_CATALOG_BASE_URL", DEFAULT_CATALOG_BASE_URL),
        )?;
        let timeout_secs = get_env_or_default("VIORRA_CATALOG_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("VIORRA_CATALOG_TIMEOUT_SECS".to_owned(), e.to_string())
            })?;
        let user_agent = get_env_or_default("VIORRA_CATALOG_USER_AGENT", DEFAULT_USER_AGENT);
        let data_dir = PathBuf::from(get_env_or_default("VIORRA_DATA_DIR", "./data"));
        let debounce_ms = get_env_or_default(
            "VIORRA_SEARCH_DEBOUNCE_MS",
            &DEFAULT_SEARCH_DEBOUNCE_MS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("VIORRA_SEARCH_DEBOUNCE_MS".to_owned(), e.to_string())
        })?;
        let page_limit = get_env_or_default("VIORRA_PAGE_LIMIT", "20")
            .parse::<u32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("VIORRA_PAGE_LIMIT".to_owned(), e.to_string())
            })?;

        Ok(Self {
            catalog: CatalogConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
                user_agent,
            },
            data_dir,
            search_debounce: Duration::from_millis(debounce_ms),
            page_limit,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            data_dir: PathBuf::from("./data"),
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            page_limit: 20,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            // The default constant is a valid URL, so this cannot panic.
            #[allow(clippy::expect_used)]
            base_url: Url::parse(DEFAULT_CATALOG_BASE_URL).expect("default base URL is valid"),
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse and validate an http(s) base URL.
fn parse_base_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_owned(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_owned(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url)
}
