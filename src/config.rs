//! # Configuration Management
//!
//! Envelope constants, per-call serialization options and the crate's own
//! settings.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment overrides via `from_env()` (`CONFIG_ENVELOPE_*`)
//!
//! ## Limits
//! - Default maximum blob size (16 MiB) bounds both the encoded payload and
//!   the decompressed output, so a hostile `blob_size` can never drive an
//!   unbounded allocation.

use crate::core::serialization::SerializationFormat;
use crate::error::{EnvelopeError, Result};
use crate::utils::compression::CompressionKind;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Current envelope framing version written by this crate
pub const CURRENT_PROTO_VERSION: u32 = 1;

/// Oldest envelope framing version this crate can read
pub const MIN_PROTO_VERSION: u32 = 1;

/// Size of the fixed envelope header in bytes
pub const HEADER_SIZE: usize = 24;

/// Default max payload size, compressed or not (16 MiB)
pub const MAX_BLOB_SIZE: usize = 16 * 1024 * 1024;

/// Hard ceiling accepted for a configured `max_blob_size` (1 GiB)
pub const MAX_BLOB_SIZE_CEILING: usize = 1024 * 1024 * 1024;

/// Version of a default-constructed configuration with no history
pub const EMPTY_VERSION: u64 = 0;

/// Whether to compress payloads by default
pub const ENABLE_COMPRESSION: bool = true;

/// Returns true if `proto_version` is a framing version this crate can read
#[inline]
pub fn is_supported_proto_version(proto_version: u32) -> bool {
    (MIN_PROTO_VERSION..=CURRENT_PROTO_VERSION).contains(&proto_version)
}

/// Per-call options for envelope serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SerializeOptions {
    /// Route the payload through the compressor and set the compressed flag
    pub compression: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            compression: ENABLE_COMPRESSION,
        }
    }
}

impl SerializeOptions {
    /// Options with compression disabled
    pub fn uncompressed() -> Self {
        Self { compression: false }
    }
}

/// Main configuration structure for the envelope codec
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CodecConfig {
    /// Envelope encoding settings
    #[serde(default)]
    pub envelope: EnvelopeConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CodecConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| EnvelopeError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| EnvelopeError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| EnvelopeError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables on top of the defaults.
    /// Unparsable values are ignored.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("CONFIG_ENVELOPE_COMPRESSION") {
            if let Ok(val) = value.parse::<bool>() {
                config.envelope.compression = val;
            }
        }

        if let Ok(value) = std::env::var("CONFIG_ENVELOPE_COMPRESSION_KIND") {
            if let Some(kind) = CompressionKind::from_name(&value) {
                config.envelope.compression_kind = kind;
            }
        }

        if let Ok(value) = std::env::var("CONFIG_ENVELOPE_PAYLOAD_FORMAT") {
            if let Some(format) = SerializationFormat::from_name(&value) {
                config.envelope.payload_format = format;
            }
        }

        if let Ok(value) = std::env::var("CONFIG_ENVELOPE_MAX_BLOB_SIZE") {
            if let Ok(val) = value.parse::<usize>() {
                config.envelope.max_blob_size = val;
            }
        }

        if let Ok(value) = std::env::var("CONFIG_ENVELOPE_LOG_LEVEL") {
            if let Ok(level) = value.parse::<Level>() {
                config.logging.log_level = level;
            }
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| EnvelopeError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| EnvelopeError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration.
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.envelope.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(EnvelopeError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Envelope encoding settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnvelopeConfig {
    /// Compress payloads when serializing
    pub compression: bool,

    /// Compression algorithm used for payloads
    pub compression_kind: CompressionKind,

    /// Object graph encoding for the payload
    pub payload_format: SerializationFormat,

    /// Largest payload accepted on write and produced on decompression
    pub max_blob_size: usize,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            compression: ENABLE_COMPRESSION,
            compression_kind: CompressionKind::default(),
            payload_format: SerializationFormat::default(),
            max_blob_size: MAX_BLOB_SIZE,
        }
    }
}

impl EnvelopeConfig {
    /// Serialization options derived from this configuration
    pub fn serialize_options(&self) -> SerializeOptions {
        SerializeOptions {
            compression: self.compression,
        }
    }

    /// Validate envelope configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_blob_size == 0 {
            errors.push("Max blob size must be greater than 0".to_string());
        } else if self.max_blob_size > MAX_BLOB_SIZE_CEILING {
            errors.push(format!(
                "Max blob size too large: {} bytes (maximum: {} bytes)",
                self.max_blob_size, MAX_BLOB_SIZE_CEILING
            ));
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to log to console
    pub log_to_console: bool,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("config-envelope"),
            log_level: Level::INFO,
            log_to_console: true,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        if self.json_format && !self.log_to_console {
            errors.push("json_format has no effect when log_to_console is false".to_string());
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_proto_versions() {
        assert!(is_supported_proto_version(CURRENT_PROTO_VERSION));
        assert!(!is_supported_proto_version(0));
        assert!(!is_supported_proto_version(CURRENT_PROTO_VERSION + 1));
    }

    #[test]
    fn test_serialize_options_default_compresses() {
        assert!(SerializeOptions::default().compression);
        assert!(!SerializeOptions::uncompressed().compression);
    }

    #[test]
    fn test_envelope_config_options() {
        let mut envelope = EnvelopeConfig::default();
        assert_eq!(envelope.serialize_options(), SerializeOptions::default());
        envelope.compression = false;
        assert_eq!(envelope.serialize_options(), SerializeOptions::uncompressed());
    }
}
