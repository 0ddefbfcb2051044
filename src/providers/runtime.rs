//! Process and build information.

use serde_json::json;

use crate::diagnostics::{DiagnosticsProvider, ProviderError, ProviderState, Snapshot};

/// Reports what is running: package, build, target, process.
pub struct RuntimeProvider {
    state: ProviderState,
    log_filter: String,
}

impl RuntimeProvider {
    pub const KEY: &'static str = "runtime";

    pub fn new(log_filter: impl Into<String>) -> Self {
        Self {
            state: ProviderState::with_priority(100),
            log_filter: log_filter.into(),
        }
    }
}

impl DiagnosticsProvider for RuntimeProvider {
    fn key(&self) -> &str {
        Self::KEY
    }

    fn diagnostics(&self) -> Result<Snapshot, ProviderError> {
        let executable = std::env::current_exe()
            .ok()
            .map(|path| path.display().to_string());

        let mut snapshot = Snapshot::new();
        snapshot.insert("package".into(), json!(env!("CARGO_PKG_NAME")));
        snapshot.insert("version".into(), json!(crate::PKG_VERSION));
        snapshot.insert("build".into(), json!(crate::BUILD_VERSION));
        snapshot.insert(
            "profile".into(),
            json!(if cfg!(debug_assertions) { "debug" } else { "release" }),
        );
        snapshot.insert("os".into(), json!(std::env::consts::OS));
        snapshot.insert("arch".into(), json!(std::env::consts::ARCH));
        snapshot.insert("family".into(), json!(std::env::consts::FAMILY));
        snapshot.insert("pid".into(), json!(std::process::id()));
        snapshot.insert("cpus".into(), json!(num_cpus::get()));
        snapshot.insert("physical_cpus".into(), json!(num_cpus::get_physical()));
        snapshot.insert("executable".into(), json!(executable));
        snapshot.insert("log_filter".into(), json!(self.log_filter));
        Ok(snapshot)
    }

    fn state(&self) -> &ProviderState {
        &self.state
    }
}
