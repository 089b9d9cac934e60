//! Structured logging setup.
//!
//! `RUST_LOG` controls filtering (default `info`), `LOG_FORMAT=json` switches the
//! console output to JSON lines.

use std::sync::OnceLock;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Installs the global subscriber. Safe to call more than once.
pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let json = std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let layer: Box<dyn Layer<Registry> + Send + Sync> = if json {
            fmt::layer().with_target(true).json().boxed()
        } else {
            fmt::layer().with_target(true).boxed()
        };

        // Another subscriber may already be installed (e.g. by a test harness).
        if tracing_subscriber::registry()
            .with(layer.with_filter(filter))
            .try_init()
            .is_err()
        {
            tracing::debug!("global tracing subscriber already initialized");
        }
    });
}
