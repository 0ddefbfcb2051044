//! Error types for the diagnostics engine.

use std::fmt;

/// Errors that abort a whole `collect` call.
#[derive(Debug)]
pub enum DiagnosticsError {
    /// The selection named a key that is not registered.
    UnknownProvider {
        /// The offending key.
        key: String,
        /// Every registered key, in registration order.
        available: Vec<String>,
    },

    /// The cache store failed.
    Cache(CacheError),
}

impl DiagnosticsError {
    /// Returns true if the caller supplied bad input (as opposed to an internal failure).
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, DiagnosticsError::UnknownProvider { .. })
    }

    /// Registered keys to show next to an unknown-provider error.
    pub fn available_providers(&self) -> Option<&[String]> {
        match self {
            DiagnosticsError::UnknownProvider { available, .. } => Some(available),
            DiagnosticsError::Cache(_) => None,
        }
    }
}

impl fmt::Display for DiagnosticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticsError::UnknownProvider { key, .. } => {
                write!(f, "Invalid diagnostics provider: \"{}\"", key)
            }
            DiagnosticsError::Cache(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DiagnosticsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiagnosticsError::Cache(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CacheError> for DiagnosticsError {
    fn from(e: CacheError) -> Self {
        DiagnosticsError::Cache(e)
    }
}

/// Failure raised by a single provider while taking its snapshot.
#[derive(Debug)]
pub enum ProviderError {
    /// I/O failure while reading a data source.
    Io {
        context: String,
        error: std::io::Error,
    },

    /// The data source does not exist on this platform.
    Unsupported(String),

    /// Custom error with message.
    Custom(String),
}

impl ProviderError {
    /// Wrap an I/O error with a short description of what was being read.
    pub fn io(context: impl Into<String>, error: std::io::Error) -> Self {
        ProviderError::Io {
            context: context.into(),
            error,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Io { context, error } => write!(f, "{}: {}", context, error),
            ProviderError::Unsupported(what) => write!(f, "{} is not supported on this platform", what),
            ProviderError::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProviderError::Io { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<String> for ProviderError {
    fn from(msg: String) -> Self {
        ProviderError::Custom(msg)
    }
}

impl From<&str> for ProviderError {
    fn from(msg: &str) -> Self {
        ProviderError::Custom(msg.to_string())
    }
}

/// Configuration errors detected while building the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two providers reported the same key.
    DuplicateKey(String),
    /// A provider reported an empty key.
    EmptyKey,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateKey(key) => {
                write!(f, "diagnostics provider \"{}\" is registered more than once", key)
            }
            RegistryError::EmptyKey => write!(f, "diagnostics provider key must not be empty"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Failures of the cache store behind the caching decorator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A lock guarding the store was poisoned by a panicking writer.
    Poisoned,
    /// Backend-specific failure.
    Backend(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Poisoned => write!(f, "diagnostics cache lock poisoned"),
            CacheError::Backend(msg) => write!(f, "diagnostics cache error: {}", msg),
        }
    }
}

impl std::error::Error for CacheError {}
