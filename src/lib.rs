//! sysdiag - diagnostics aggregation engine.
//!
//! Gathers point-in-time snapshots from pluggable providers into a single
//! report keyed by provider. A failing provider never sinks the whole
//! collection: its slot carries an error entry and the rest are reported
//! normally.
//!
//! # Features
//!
//! - **Provider registry**: explicit registration, unique keys, enabled flag and priority
//! - **Concurrent collection**: providers run on Tokio's blocking pool with optional timeout
//! - **Error isolation**: provider errors and panics become per-key error entries
//! - **Caching**: TTL decorator over any collector with a pluggable store
//! - **Built-in providers**: runtime, application, environment, system, metrics
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sysdiag::diagnostics::{CachedCollector, DiagnosticsCollector, ProviderRegistry, Selection, SystemCollector};
//! use sysdiag::observability::EngineMetrics;
//! use sysdiag::{providers, Config};
//!
//! let config = Config::from_env()?;
//! let metrics = Arc::new(EngineMetrics::new()?);
//! let registry = Arc::new(ProviderRegistry::new(providers::builtin(&config, &metrics))?);
//! let collector = CachedCollector::in_memory(SystemCollector::new(registry));
//!
//! let report = collector.collect(&Selection::all()).await?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit hash (8 chars) with optional "-dirty" suffix
pub const BUILD_VERSION: &str = env!("BUILD_VERSION");

/// Full version string: "0.1.0 (abc12345)" or "0.1.0 (abc12345-dirty)"
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_VERSION"), ")");

pub mod config;
pub mod diagnostics;
pub mod logging;
pub mod observability;
pub mod providers;
pub mod system;

// Re-exports for convenience
pub use config::Config;
pub use diagnostics::{
    DiagnosticsCollector, DiagnosticsError, DiagnosticsReport, ProviderRegistry, Selection,
};
