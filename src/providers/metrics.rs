//! Prometheus registry snapshot.

use prometheus::proto::{Metric, MetricType};
use prometheus::Registry;
use serde_json::json;

use crate::diagnostics::{DiagnosticsProvider, ProviderError, ProviderState, Snapshot};

/// Exposes every sample of a Prometheus registry as `name{labels}` → value.
///
/// Histograms and summaries contribute `_count` and `_sum` entries.
pub struct MetricsProvider {
    state: ProviderState,
    registry: Registry,
}

impl MetricsProvider {
    pub const KEY: &'static str = "metrics";

    pub fn new(registry: Registry) -> Self {
        Self {
            state: ProviderState::with_priority(10),
            registry,
        }
    }
}

impl DiagnosticsProvider for MetricsProvider {
    fn key(&self) -> &str {
        Self::KEY
    }

    fn diagnostics(&self) -> Result<Snapshot, ProviderError> {
        let mut snapshot = Snapshot::new();

        for family in self.registry.gather() {
            let name = family.get_name();
            for metric in family.get_metric() {
                let labels = label_suffix(metric);
                match family.get_field_type() {
                    MetricType::COUNTER => {
                        let value = metric.get_counter().get_value();
                        snapshot.insert(format!("{}{}", name, labels), json!(value));
                    }
                    MetricType::GAUGE => {
                        let value = metric.get_gauge().get_value();
                        snapshot.insert(format!("{}{}", name, labels), json!(value));
                    }
                    MetricType::UNTYPED => {
                        let value = metric.get_untyped().get_value();
                        snapshot.insert(format!("{}{}", name, labels), json!(value));
                    }
                    MetricType::HISTOGRAM => {
                        let h = metric.get_histogram();
                        snapshot.insert(
                            format!("{}_count{}", name, labels),
                            json!(h.get_sample_count()),
                        );
                        snapshot.insert(format!("{}_sum{}", name, labels), json!(h.get_sample_sum()));
                    }
                    MetricType::SUMMARY => {
                        let s = metric.get_summary();
                        snapshot.insert(
                            format!("{}_count{}", name, labels),
                            json!(s.get_sample_count()),
                        );
                        snapshot.insert(format!("{}_sum{}", name, labels), json!(s.get_sample_sum()));
                    }
                }
            }
        }

        Ok(snapshot)
    }

    fn state(&self) -> &ProviderState {
        &self.state
    }
}

/// `{a="1",b="2"}` with labels sorted by name, or empty.
fn label_suffix(metric: &Metric) -> String {
    let mut pairs: Vec<(&str, &str)> = metric
        .get_label()
        .iter()
        .map(|pair| (pair.get_name(), pair.get_value()))
        .collect();
    if pairs.is_empty() {
        return String::new();
    }
    pairs.sort_unstable();

    let body = pairs
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, v))
        .collect::<Vec<_>>()
        .join(",");
    format!("{{{}}}", body)
}
