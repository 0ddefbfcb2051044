//! Prometheus metrics for the diagnostics engine.
//!
//! Counts collections, cache hits/misses and provider failures, and times
//! each provider run. The `metrics` provider reads them back as a snapshot.

use std::time::Duration;

use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, IntCounter, Opts, Registry, TextEncoder,
};

/// Prometheus registry with all engine metrics.
pub struct EngineMetrics {
    registry: Registry,

    /// Completed `collect` calls on the uncached collector
    pub collections_total: IntCounter,

    /// Rejected `collect` calls (unknown provider)
    pub rejected_total: IntCounter,

    /// Provider runs by provider and outcome (ok, error)
    pub provider_runs_total: CounterVec,

    /// Provider run duration in seconds
    pub provider_duration_seconds: HistogramVec,

    /// Cache lookups by result (hit, miss)
    pub cache_lookups_total: CounterVec,
}

impl EngineMetrics {
    /// Create a new metrics registry with all metrics.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Provider buckets (in seconds): /proc reads are sub-millisecond, disk stats can stall
        let provider_buckets = vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0];

        let collections_total = IntCounter::new(
            "sysdiag_collections_total",
            "Total diagnostics collections",
        )?;
        registry.register(Box::new(collections_total.clone()))?;

        let rejected_total = IntCounter::new(
            "sysdiag_collections_rejected_total",
            "Collections rejected because of an unknown provider",
        )?;
        registry.register(Box::new(rejected_total.clone()))?;

        let provider_runs_total = CounterVec::new(
            Opts::new("sysdiag_provider_runs_total", "Total provider runs"),
            &["provider", "outcome"],
        )?;
        registry.register(Box::new(provider_runs_total.clone()))?;

        let provider_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "sysdiag_provider_duration_seconds",
                "Provider run duration in seconds",
            )
            .buckets(provider_buckets),
            &["provider"],
        )?;
        registry.register(Box::new(provider_duration_seconds.clone()))?;

        let cache_lookups_total = CounterVec::new(
            Opts::new("sysdiag_cache_lookups_total", "Diagnostics cache lookups"),
            &["result"],
        )?;
        registry.register(Box::new(cache_lookups_total.clone()))?;

        Ok(Self {
            registry,
            collections_total,
            rejected_total,
            provider_runs_total,
            provider_duration_seconds,
            cache_lookups_total,
        })
    }

    /// Record one provider run.
    #[inline]
    pub fn record_provider(&self, provider: &str, failed: bool, elapsed: Duration) {
        let outcome = if failed { "error" } else { "ok" };
        self.provider_runs_total
            .with_label_values(&[provider, outcome])
            .inc();
        self.provider_duration_seconds
            .with_label_values(&[provider])
            .observe(elapsed.as_secs_f64());
    }

    /// Record a cache lookup.
    #[inline]
    pub fn record_cache(&self, hit: bool) {
        let result = if hit { "hit" } else { "miss" };
        self.cache_lookups_total.with_label_values(&[result]).inc();
    }

    /// Encode all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Get the Prometheus registry (for custom metrics).
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
