//! Tracing setup for the consuming application.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// Honors `RUST_LOG` when set; defaults to info level for this crate.
/// Call once at startup, before any state construction so client and
/// store setup is captured.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing() -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "viorra_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
