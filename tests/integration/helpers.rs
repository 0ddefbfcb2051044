//! Test helpers and utilities

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};
use sysdiag::diagnostics::{
    DiagnosticsProvider, DiagnosticsReport, FnProvider, ProviderError, ProviderRegistry, Snapshot,
};

/// Snapshot from `(field, value)` pairs.
pub fn snapshot(fields: &[(&str, Value)]) -> Snapshot {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Provider that always returns `{"version": version}`.
pub fn static_provider(key: &str, version: &str) -> Arc<dyn DiagnosticsProvider> {
    let fields = snapshot(&[("version", json!(version))]);
    Arc::new(FnProvider::new(key, move || Ok(fields.clone())))
}

/// Provider that always fails with `message`.
pub fn failing_provider(key: &str, message: &'static str) -> Arc<dyn DiagnosticsProvider> {
    Arc::new(FnProvider::new(key, move || Err(ProviderError::from(message))))
}

/// Provider that counts its runs.
pub struct Counted {
    pub provider: Arc<dyn DiagnosticsProvider>,
    pub runs: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl Counted {
    pub fn new(key: &str) -> Self {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let provider: Arc<dyn DiagnosticsProvider> = Arc::new(FnProvider::new(key, move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(snapshot(&[("run", json!(n))]))
        }));
        Self { provider, runs }
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

/// Registry over `providers`, panicking on configuration errors.
pub fn registry(providers: Vec<Arc<dyn DiagnosticsProvider>>) -> Arc<ProviderRegistry> {
    Arc::new(ProviderRegistry::new(providers).expect("valid provider set"))
}

/// Keys of a report, in order.
pub fn report_keys(report: &DiagnosticsReport) -> Vec<String> {
    report.keys().map(String::from).collect()
}

/// Serialized report as a JSON value.
pub fn to_json(report: &DiagnosticsReport) -> Value {
    serde_json::to_value(report).expect("report serializes")
}
