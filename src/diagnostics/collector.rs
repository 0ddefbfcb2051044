//! Collector: selection, execution and per-provider error isolation.

use std::any::Any;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::{debug, warn};

use super::error::DiagnosticsError;
use super::provider::DiagnosticsProvider;
use super::registry::ProviderRegistry;
use super::selection::Selection;
use super::types::{DiagnosticsReport, ProviderFailure, ProviderOutcome};
use crate::observability::EngineMetrics;

/// Contract shared by the collector and its decorators.
#[async_trait]
pub trait DiagnosticsCollector: Send + Sync {
    /// Run the selected providers and merge their snapshots.
    ///
    /// Fails only when the selection names an unknown provider (or a
    /// decorator's own store fails). Provider failures are reported per key.
    async fn collect(&self, selection: &Selection) -> Result<DiagnosticsReport, DiagnosticsError>;

    /// Every registered key, regardless of enabled state.
    fn available_providers(&self) -> Vec<String>;
}

/// Collector over a [`ProviderRegistry`].
///
/// Providers run concurrently on the blocking pool, one task per key. A
/// provider that errors, panics or exceeds the optional timeout yields a
/// failure entry; the others are unaffected.
pub struct SystemCollector {
    registry: Arc<ProviderRegistry>,
    provider_timeout: Option<Duration>,
    metrics: Option<Arc<EngineMetrics>>,
}

impl SystemCollector {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry,
            provider_timeout: None,
            metrics: None,
        }
    }

    /// Fail providers that take longer than `timeout` (None = wait forever).
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<EngineMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Resolve the selection to provider handles, in execution order.
    ///
    /// Unknown keys fail before anything runs. Repeated keys run once.
    fn resolve(
        &self,
        selection: &Selection,
    ) -> Result<Vec<Arc<dyn DiagnosticsProvider>>, DiagnosticsError> {
        if selection.is_all() {
            return Ok(self
                .registry
                .iter()
                .filter(|p| p.is_enabled())
                .cloned()
                .collect());
        }

        let mut seen = HashSet::with_capacity(selection.keys().len());
        let mut selected = Vec::with_capacity(selection.keys().len());
        for key in selection.keys() {
            let provider = self
                .registry
                .get(key)
                .ok_or_else(|| DiagnosticsError::UnknownProvider {
                    key: key.clone(),
                    available: self.registry.keys(),
                })?;
            if seen.insert(key.as_str()) {
                selected.push(Arc::clone(provider));
            }
        }
        Ok(selected)
    }

    /// Run one provider inside its isolation boundary.
    async fn run(
        provider: Arc<dyn DiagnosticsProvider>,
        timeout: Option<Duration>,
    ) -> (String, ProviderOutcome, Duration) {
        let key = provider.key().to_string();
        let start = Instant::now();

        let handle = tokio::task::spawn_blocking(move || provider.diagnostics());

        let joined = match timeout {
            Some(limit) => match tokio::time::timeout(limit, handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    let cause = format!("timed out after {}ms", limit.as_millis());
                    let outcome = ProviderOutcome::Failed(ProviderFailure::new(&key, cause));
                    return (key, outcome, start.elapsed());
                }
            },
            None => handle.await,
        };

        let outcome = match joined {
            Ok(Ok(snapshot)) => ProviderOutcome::Snapshot(snapshot),
            Ok(Err(e)) => ProviderOutcome::Failed(ProviderFailure::new(&key, e)),
            Err(join_err) => {
                let cause = if join_err.is_panic() {
                    panic_message(join_err.into_panic())
                } else {
                    "task cancelled".to_string()
                };
                ProviderOutcome::Failed(ProviderFailure::new(&key, cause))
            }
        };

        (key, outcome, start.elapsed())
    }
}

#[async_trait]
impl DiagnosticsCollector for SystemCollector {
    async fn collect(&self, selection: &Selection) -> Result<DiagnosticsReport, DiagnosticsError> {
        let start = Instant::now();

        let selected = match self.resolve(selection) {
            Ok(selected) => selected,
            Err(e) => {
                if let Some(ref metrics) = self.metrics {
                    metrics.rejected_total.inc();
                }
                return Err(e);
            }
        };

        let timeout = self.provider_timeout;
        let runs = selected
            .into_iter()
            .map(|provider| Self::run(provider, timeout));

        // join_all preserves input order, so the report follows the selection
        let results = join_all(runs).await;

        let mut report = DiagnosticsReport::with_capacity(results.len());
        for (key, outcome, elapsed) in results {
            if let Some(failure) = outcome.failure() {
                warn!(
                    provider = %key,
                    error = %failure.message(),
                    "Diagnostics provider failed"
                );
            }
            if let Some(ref metrics) = self.metrics {
                metrics.record_provider(&key, outcome.is_failure(), elapsed);
            }
            report.insert(key, outcome);
        }

        if let Some(ref metrics) = self.metrics {
            metrics.collections_total.inc();
        }

        debug!(
            providers = ?report.keys().collect::<Vec<_>>(),
            failures = report.failure_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Diagnostics collected"
        );

        Ok(report)
    }

    fn available_providers(&self) -> Vec<String> {
        self.registry.keys()
    }
}

/// Extract a readable message from a panic payload.
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "provider panicked".to_string()
    }
}
