//! Structured logging setup.
//!
//! The library itself only emits `tracing` events. Binaries, tests and
//! benches that want to see them call [`init_logging`] once.

use crate::config::LoggingConfig;
use crate::error::{EnvelopeError, Result};
use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber according to `config`.
///
/// `RUST_LOG` takes precedence over the configured level. Returns `Ok(false)`
/// when console logging is disabled or a subscriber was already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<bool> {
    if !config.log_to_console {
        return Ok(false);
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.log_level.as_str().to_ascii_lowercase())
            .map_err(|e| EnvelopeError::ConfigError(format!("Invalid log filter: {e}")))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json_format {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if installed {
        tracing::info!(app = %config.app_name, "Logging initialized");
    }
    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_disabled_console_installs_nothing() {
        let config = LoggingConfig {
            log_to_console: false,
            ..LoggingConfig::default()
        };
        assert!(!init_logging(&config).unwrap());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_second_init_is_harmless() {
        let config = LoggingConfig::default();
        let _ = init_logging(&config).unwrap();
        assert!(!init_logging(&config).unwrap());
    }
}
