//! Configuration error types.

use std::fmt;

/// Environment variable that could not be turned into a setting.
#[derive(Debug)]
pub enum ConfigError {
    /// The value does not parse as the expected type.
    Parse {
        key: String,
        value: String,
        error: String,
    },
    /// The value parses but is not allowed.
    Invalid { key: String, message: String },
}

impl ConfigError {
    /// Name of the offending variable.
    pub fn key(&self) -> &str {
        match self {
            ConfigError::Parse { key, .. } | ConfigError::Invalid { key, .. } => key,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse { key, value, error } => {
                write!(f, "sysdiag config: {}={:?} does not parse ({})", key, value, error)
            }
            ConfigError::Invalid { key, message } => {
                write!(f, "sysdiag config: {} rejected: {}", key, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
