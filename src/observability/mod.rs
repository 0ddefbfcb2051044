//! Observability for the diagnostics engine.
//!
//! Engine-level Prometheus metrics. The registry is owned by the caller and
//! shared with the collector, the caching decorator and the `metrics` provider.

mod metrics;

pub use metrics::EngineMetrics;
