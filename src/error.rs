//! Error types for the fallible edges of the engine.
//!
//! The window/overlap/scenario computations are total and never fail. Only
//! configuration and signal-file loading can go wrong.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config: {0}")]
    Read(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}

impl ConfigError {
    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => {
                "Create the file or omit --config to use built-in defaults."
            }
            ConfigError::Read(_) => "Check file permissions.",
            ConfigError::Parse(_) => "Check the config is valid camelCase JSON.",
            ConfigError::Invalid { .. } => "Fix the named field or remove it to use its default.",
            ConfigError::UnknownTimezone(_) => "Use an IANA timezone name such as \"America/New_York\".",
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Read(err.to_string())
    }
}

/// Signal file loading errors
#[derive(Debug, Error)]
pub enum SignalLoadError {
    #[error("Signal file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read signals: {0}")]
    Read(String),

    #[error("Failed to parse signals: {0}")]
    Parse(String),
}

impl From<std::io::Error> for SignalLoadError {
    fn from(err: std::io::Error) -> Self {
        SignalLoadError::Read(err.to_string())
    }
}
