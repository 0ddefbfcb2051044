//! Collection and caching configuration.

use std::time::Duration;

use super::parse::EnvSource;
use super::ConfigError;

/// Diagnostics engine configuration.
#[derive(Clone, Debug)]
pub struct DiagnosticsConfig {
    /// Cache TTL; `None` disables the caching decorator.
    pub cache_ttl: Option<Duration>,
    /// Per-provider time limit; `None` waits indefinitely.
    pub provider_timeout: Option<Duration>,
    /// Providers switched off at startup.
    pub disabled: Vec<String>,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Some(crate::diagnostics::DEFAULT_CACHE_TTL),
            provider_timeout: None,
            disabled: Vec::new(),
        }
    }
}

impl DiagnosticsConfig {
    pub fn from_source(env: &EnvSource) -> Result<Self, ConfigError> {
        Ok(Self {
            cache_ttl: env.env_duration("DIAGNOSTICS_CACHE_TTL", "300s")?,
            provider_timeout: env.env_duration("DIAGNOSTICS_PROVIDER_TIMEOUT", "off")?,
            disabled: env.env_list("DIAGNOSTICS_DISABLED"),
        })
    }

    #[inline]
    pub fn cache_enabled(&self) -> bool {
        self.cache_ttl.is_some()
    }
}
