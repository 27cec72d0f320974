//! Subscriber installation.
//!
//! The codecs only emit `tracing` events; applications that want them on
//! stderr call [`init_logging`] once at startup.

use crate::config::LoggingConfig;
use crate::error::{constants, ProtocolError, Result};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` when set, otherwise the configured level
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(config.log_level).into())
        .from_env()
        .map_err(|e| ProtocolError::ConfigError(format!("{}: {e}", constants::ERR_LOG_FILTER)))
}

/// Install a global fmt subscriber.
///
/// Returns `Ok(false)` if a global subscriber was already installed, in which
/// case the existing one is left in place.
pub fn init_logging(config: &LoggingConfig) -> Result<bool> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config)?)
        .with_target(false);

    let installed = if config.json_format {
        subscriber.json().try_init().is_ok()
    } else {
        subscriber.try_init().is_ok()
    };

    if installed {
        info!(app = %config.app_name, log_level = %config.log_level, "Logging initialized");
    }
    Ok(installed)
}
