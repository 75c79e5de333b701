//! Logging bootstrap for hosts embedding SenderNews

use crate::config::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Fails if a
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> crate::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| crate::Error::Config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format.as_str() {
        "json" => registry
            .with(fmt::layer().json().with_target(true).with_level(true))
            .try_init(),
        "text" => registry
            .with(fmt::layer().with_target(true).with_level(true))
            .try_init(),
        other => {
            return Err(crate::Error::Config(format!(
                "Unknown log format '{}', expected \"json\" or \"text\"",
                other
            )))
        }
    };

    result.map_err(|e| crate::Error::Config(format!("Failed to install logger: {}", e)))
}
