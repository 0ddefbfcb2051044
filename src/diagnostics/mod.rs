//! Diagnostics aggregation engine.
//!
//! Collects point-in-time snapshots from independent providers into one
//! report, keyed by provider, with per-provider failure isolation.
//!
//! ```text
//! caller ──▶ CachedCollector ──▶ SystemCollector ──▶ ProviderRegistry
//!              (optional)          │
//!                                  ├──▶ provider "runtime"  ─┐
//!                                  ├──▶ provider "system"   ─┼──▶ DiagnosticsReport
//!                                  └──▶ provider "metrics"  ─┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sysdiag::diagnostics::{CachedCollector, DiagnosticsCollector, ProviderRegistry, Selection, SystemCollector};
//!
//! let registry = Arc::new(ProviderRegistry::new(providers)?);
//! let collector = CachedCollector::in_memory(SystemCollector::new(registry));
//!
//! // Every enabled provider
//! let report = collector.collect(&Selection::all()).await?;
//!
//! // Exactly these, in this order (disabled ones included)
//! let report = collector.collect(&Selection::only(["runtime", "system"])).await?;
//! ```

pub mod cache;
pub mod collector;
pub mod error;
pub mod provider;
pub mod registry;
pub mod response;
pub mod selection;
pub mod types;

pub use cache::{CacheStore, CachedCollector, MemoryCache, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL};
pub use collector::{DiagnosticsCollector, SystemCollector};
pub use error::{CacheError, DiagnosticsError, ProviderError, RegistryError};
pub use provider::{DiagnosticsProvider, FnProvider, ProviderState};
pub use registry::ProviderRegistry;
pub use response::{DiagnosticsResponse, ResponseMetadata};
pub use selection::{DiagnosticsLevel, Selection};
pub use types::{DiagnosticsReport, ProviderFailure, ProviderOutcome, Snapshot};
