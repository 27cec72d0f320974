//! # Configuration Management
//!
//! Centralized configuration for the wire codecs.
//!
//! This module provides structured configuration for handshake message limits,
//! the set of protocol versions a peer is willing to speak, and logging.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-specific overrides via `from_env()`
//!
//! ## Security Considerations
//! - Handshake limits bound how much memory a single untrusted message can claim
//! - The supported version list is the only input to version negotiation

use crate::error::{constants, ProtocolError, Result};
use crate::protocol::version::{Version, SUPPORTED_VERSIONS};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Maximum number of entries in one handshake message
pub const MAX_HANDSHAKE_ENTRIES: usize = 128;

/// Maximum length of a single handshake value in bytes
pub const MAX_HANDSHAKE_VALUE_LENGTH: usize = 4000;

/// Environment variables read by [`WireConfig::from_env`]
pub const ENV_OVERRIDES: [&str; 4] = [
    "QUIC_WIRE_MAX_ENTRIES",
    "QUIC_WIRE_MAX_VALUE_LENGTH",
    "QUIC_WIRE_SUPPORTED_VERSIONS",
    "QUIC_WIRE_LOG_LEVEL",
];

/// Main configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct WireConfig {
    /// Handshake message decoding limits
    #[serde(default)]
    pub handshake: HandshakeConfig,

    /// Version negotiation settings
    #[serde(default)]
    pub versions: VersionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WireConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path).map_err(|e| {
            ProtocolError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_OPEN))
        })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(|e| {
            ProtocolError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_READ))
        })?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content).map_err(|e| {
            ProtocolError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_PARSE))
        })
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Start with defaults
        let mut config = Self::default();

        if let Ok(entries) = std::env::var(ENV_OVERRIDES[0]) {
            if let Ok(val) = entries.parse::<usize>() {
                config.handshake.max_entries = val;
            }
        }

        if let Ok(length) = std::env::var(ENV_OVERRIDES[1]) {
            if let Ok(val) = length.parse::<usize>() {
                config.handshake.max_value_length = val;
            }
        }

        // A malformed version list is an error, not ignored
        if let Ok(list) = std::env::var(ENV_OVERRIDES[2]) {
            config.versions.supported = list
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(str::parse::<Version>)
                .collect::<Result<Vec<_>>>()?;
        }

        if let Ok(level) = std::env::var(ENV_OVERRIDES[3]) {
            if let Ok(val) = level.parse::<Level>() {
                config.logging.log_level = val;
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

    /// Generate a commented configuration template holding the defaults.
    ///
    /// Each setting also has an environment override, listed in the header.
    pub fn example_config() -> String {
        let body = toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config\n"));

        let mut out = String::from("# quic-wire configuration\n#\n# Environment overrides:\n");
        for var in ENV_OVERRIDES {
            out.push_str("#   ");
            out.push_str(var);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&body);
        out
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            ProtocolError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_SERIALIZE))
        })?;

        std::fs::write(path, content).map_err(|e| {
            ProtocolError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_WRITE))
        })?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.handshake.validate());
        errors.extend(self.versions.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Limits applied when decoding handshake messages
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HandshakeConfig {
    /// Maximum number of tag/value entries per message
    pub max_entries: usize,

    /// Maximum length of any single value
    pub max_value_length: usize,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            max_entries: MAX_HANDSHAKE_ENTRIES,
            max_value_length: MAX_HANDSHAKE_VALUE_LENGTH,
        }
    }
}

impl HandshakeConfig {
    /// Validate handshake limits
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_entries == 0 {
            errors.push("Max handshake entries must be greater than 0".to_string());
        } else if self.max_entries > u16::MAX as usize {
            errors.push(format!(
                "Max handshake entries too large: {} (the wire count field is 16 bits)",
                self.max_entries
            ));
        }

        if self.max_value_length == 0 {
            errors.push("Max handshake value length must be greater than 0".to_string());
        } else if self.max_value_length > 64 * 1024 {
            errors.push(format!(
                "Max handshake value length too large: {} bytes (maximum recommended: 64 KB)",
                self.max_value_length
            ));
        }

        errors
    }
}

/// Versions offered and accepted during negotiation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VersionConfig {
    /// Supported versions, any order
    pub supported: Vec<Version>,
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            supported: SUPPORTED_VERSIONS.to_vec(),
        }
    }
}

impl VersionConfig {
    /// Validate the version list
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.supported.is_empty() {
            errors.push("Supported version list cannot be empty".to_string());
        }

        let mut seen = HashSet::new();
        for version in &self.supported {
            if version.to_tag().is_none() {
                errors.push(format!(
                    "Invalid version number: {} (valid range: 1-99)",
                    version.number()
                ));
            }
            if !seen.insert(*version) {
                errors.push(format!("Duplicate supported version: {version}"));
            }
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

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("quic-wire"),
            log_level: Level::INFO,
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
