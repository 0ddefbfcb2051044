//! Application identity.

use serde_json::json;

use crate::config::ApplicationConfig;
use crate::diagnostics::{DiagnosticsProvider, ProviderError, ProviderState, Snapshot};

/// Name and version of the hosting application.
///
/// Only identity is reported; credentials never appear in a snapshot.
pub struct ApplicationProvider {
    state: ProviderState,
    name: String,
    version: String,
}

impl ApplicationProvider {
    pub const KEY: &'static str = "application";

    pub fn new(config: &ApplicationConfig) -> Self {
        Self {
            state: ProviderState::with_priority(90),
            name: config.name.clone(),
            version: config.version.clone(),
        }
    }
}

impl DiagnosticsProvider for ApplicationProvider {
    fn key(&self) -> &str {
        Self::KEY
    }

    fn diagnostics(&self) -> Result<Snapshot, ProviderError> {
        let mut snapshot = Snapshot::new();
        snapshot.insert("name".into(), json!(self.name));
        snapshot.insert("version".into(), json!(self.version));
        Ok(snapshot)
    }

    fn state(&self) -> &ProviderState {
        &self.state
    }
}
