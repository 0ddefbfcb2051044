use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Ordered field → value data produced by one provider for one call.
pub type Snapshot = serde_json::Map<String, serde_json::Value>;

/// Failure record for one provider.
///
/// Serializes as `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderFailure {
    #[serde(rename = "error")]
    message: String,
}

impl ProviderFailure {
    /// Build the failure record for `provider` from the underlying cause.
    pub fn new(provider: &str, cause: impl fmt::Display) -> Self {
        Self {
            message: format!("Diagnostics error in provider \"{}\": {}", provider, cause),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of running one provider.
///
/// In memory the two cases are distinct variants, so a snapshot that happens
/// to contain an `error` field is never mistaken for a failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProviderOutcome {
    Snapshot(Snapshot),
    Failed(ProviderFailure),
}

impl ProviderOutcome {
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, ProviderOutcome::Failed(_))
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            ProviderOutcome::Snapshot(s) => Some(s),
            ProviderOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ProviderFailure> {
        match self {
            ProviderOutcome::Failed(f) => Some(f),
            ProviderOutcome::Snapshot(_) => None,
        }
    }
}

/// Aggregated result of one `collect` call, keyed by provider key.
///
/// Entries keep selection order. Serializes as a JSON object in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosticsReport {
    entries: Vec<(String, ProviderOutcome)>,
}

impl DiagnosticsReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Append an entry. Keys are expected to be unique; the collector guarantees it.
    pub fn insert(&mut self, key: impl Into<String>, outcome: ProviderOutcome) {
        self.entries.push((key.into(), outcome));
    }

    pub fn get(&self, key: &str) -> Option<&ProviderOutcome> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, outcome)| outcome)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Provider keys in selection order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProviderOutcome)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of providers that failed.
    pub fn failure_count(&self) -> usize {
        self.entries.iter().filter(|(_, v)| v.is_failure()).count()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for DiagnosticsReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, outcome) in &self.entries {
            map.serialize_entry(key, outcome)?;
        }
        map.end()
    }
}

impl IntoIterator for DiagnosticsReport {
    type Item = (String, ProviderOutcome);
    type IntoIter = std::vec::IntoIter<(String, ProviderOutcome)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
