//! Configuration module for sysdiag.
//!
//! This module provides centralized configuration loading from environment variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use sysdiag::config::Config;
//!
//! let config = Config::from_env()?;
//! println!("Cache TTL: {:?}", config.diagnostics.cache_ttl);
//! println!("Environment: {}", config.application.environment);
//! ```

mod application;
mod diagnostics;
mod error;
mod logging;
mod parse;

pub use application::ApplicationConfig;
pub use diagnostics::DiagnosticsConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use parse::{parse_duration, EnvSource};

/// Complete application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Collection and caching configuration.
    pub diagnostics: DiagnosticsConfig,
    /// Application identity.
    pub application: ApplicationConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&EnvSource::process())
    }

    /// Load configuration from an arbitrary source.
    pub fn from_source(env: &EnvSource) -> Result<Self, ConfigError> {
        Ok(Self {
            diagnostics: DiagnosticsConfig::from_source(env)?,
            application: ApplicationConfig::from_source(env)?,
            logging: LoggingConfig::from_source(env)?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        info!("Configuration loaded:");
        info!(
            "  Application: {} {} ({})",
            self.application.name, self.application.version, self.application.environment
        );
        info!("  Project dir: {:?}", self.application.project_dir);

        match self.diagnostics.cache_ttl {
            Some(ttl) => info!("  Cache TTL: {}s", ttl.as_secs()),
            None => info!("  Cache: disabled"),
        }

        match self.diagnostics.provider_timeout {
            Some(timeout) => info!("  Provider timeout: {}ms", timeout.as_millis()),
            None => info!("  Provider timeout: disabled"),
        }

        if !self.diagnostics.disabled.is_empty() {
            info!("  Disabled providers: {}", self.diagnostics.disabled.join(", "));
        }
    }
}
