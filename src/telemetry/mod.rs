//! Logging initialization.
//!
//! Sets up tracing-subscriber with an env filter and a fmt layer on stderr,
//! so stdout stays free for the run summary.

pub mod work;

use crate::error::{Error, Result};

/// Configuration for telemetry initialization.
pub struct TelemetryConfig {
    /// Filter used when `RUST_LOG` is unset (e.g. "info", "linepool=debug").
    pub log_level: String,
    /// Use the compact fmt layer instead of the full one.
    pub compact: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            compact: false,
        }
    }
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the fallback filter does not parse or a global
/// subscriber was already set (e.g. by another test in the same process).
pub fn init_telemetry(config: TelemetryConfig) -> Result<()> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| {
            Error::Config(format!("invalid log level \"{}\": {e}", config.log_level))
        })?,
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_thread_names(true);

    if config.compact {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.compact())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    }
    .map_err(|e| Error::Other(format!("failed to init tracing subscriber: {e}")))
}
