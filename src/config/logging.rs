//! Logging configuration.

use super::parse::EnvSource;
use super::ConfigError;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable tracing-subscriber output.
    Text,
}

/// Logging configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Log level filter (from LOG_LEVEL or RUST_LOG).
    pub filter: String,
    /// Service name for structured logging.
    pub service_name: String,
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Load configuration.
    ///
    /// Priority: LOG_LEVEL > RUST_LOG > default
    ///
    /// LOG_LEVEL accepts simple values: trace, debug, info, warn, error
    /// RUST_LOG accepts full tracing filter syntax: sysdiag=debug,tokio=warn
    pub fn from_source(env: &EnvSource) -> Result<Self, ConfigError> {
        let format = match env.env_or("LOG_FORMAT", "json").to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "text" | "pretty" => LogFormat::Text,
            other => {
                return Err(ConfigError::Invalid {
                    key: "LOG_FORMAT".into(),
                    message: format!("'{}', expected: json, text", other),
                })
            }
        };

        Ok(Self {
            filter: Self::resolve_log_filter(env),
            service_name: env.env_or("SERVICE_NAME", "sysdiag"),
            format,
        })
    }

    fn resolve_log_filter(env: &EnvSource) -> String {
        // 1. LOG_LEVEL (simple: debug, info, warn, error)
        if let Some(level) = env.env_opt("LOG_LEVEL") {
            let level = level.to_lowercase();
            match level.as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => {
                    return format!("sysdiag={}", level);
                }
                _ => {
                    // Logging is not up yet, so stderr it is
                    eprintln!(
                        "Warning: Invalid LOG_LEVEL '{}', expected: trace, debug, info, warn, error",
                        level
                    );
                }
            }
        }

        // 2. RUST_LOG (full tracing filter syntax)
        if let Some(filter) = env.env_opt("RUST_LOG") {
            return filter;
        }

        // 3. Default
        "sysdiag=info".to_string()
    }
}
