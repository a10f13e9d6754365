//! Structured logging setup for the binary.
//!
//! The library only emits `tracing` events, each tagged with an `event`
//! field. Installing a subscriber is left to the binary.

use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;
use crate::error::{ConfigError, ConfigResult};

/// Build the filter: `RUST_LOG` wins over the configured level.
pub fn build_filter(level: &str) -> ConfigResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level).map_err(|_| ConfigError::InvalidLogFilter(level.to_string())),
    }
}

/// Install the global subscriber, writing to stderr.
///
/// When a global subscriber is already installed the call does nothing.
/// Any other installation failure is returned.
pub fn init(level: &str, format: LogFormat) -> ConfigResult<()> {
    let filter = build_filter(level)?;

    if tracing::dispatcher::has_been_set() {
        tracing::debug!(event = "logger_already_installed");
        return Ok(());
    }

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Json => builder.json().with_current_span(false).try_init(),
        LogFormat::Pretty => builder.try_init(),
    };

    installed.map_err(|e| ConfigError::LoggerInit(e.to_string()))
}
