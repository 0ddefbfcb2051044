//! Host and container resources.

use std::fs;
use std::path::PathBuf;

use serde_json::{json, Value};

use crate::diagnostics::{DiagnosticsProvider, ProviderError, ProviderState, Snapshot};
use crate::system::{self, ResourceLimits, CGROUP_ROOT};

/// Memory, load, disk, uptime and cgroup limits.
///
/// Sources that do not exist on this platform are reported as `null`.
/// Only a failed disk query is treated as an error.
pub struct SystemResourceProvider {
    state: ProviderState,
    disk_path: PathBuf,
    proc_root: PathBuf,
    cgroup_root: PathBuf,
}

impl SystemResourceProvider {
    pub const KEY: &'static str = "system";

    pub fn new() -> Self {
        Self::with_paths("/", "/proc", CGROUP_ROOT)
    }

    /// Read from alternate locations (containers with remounted /proc, tests).
    pub fn with_paths(
        disk_path: impl Into<PathBuf>,
        proc_root: impl Into<PathBuf>,
        cgroup_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            state: ProviderState::with_priority(50),
            disk_path: disk_path.into(),
            proc_root: proc_root.into(),
            cgroup_root: cgroup_root.into(),
        }
    }

    fn read_proc(&self, name: &str) -> Option<String> {
        fs::read_to_string(self.proc_root.join(name)).ok()
    }

    fn memory(&self) -> Value {
        let status = self.read_proc("self/status").unwrap_or_default();
        json!({
            "resident_bytes": system::parse_status_kb(&status, "VmRSS:"),
            "peak_resident_bytes": system::parse_status_kb(&status, "VmHWM:"),
        })
    }

    fn disk(&self) -> Result<Value, ProviderError> {
        let space = system::disk_space(&self.disk_path).map_err(|e| {
            ProviderError::io(format!("statvfs {}", self.disk_path.display()), e)
        })?;
        Ok(json!({
            "path": self.disk_path.display().to_string(),
            "free_bytes": space.free,
            "total_bytes": space.total,
        }))
    }
}

impl Default for SystemResourceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticsProvider for SystemResourceProvider {
    fn key(&self) -> &str {
        Self::KEY
    }

    fn diagnostics(&self) -> Result<Snapshot, ProviderError> {
        let uptime = self
            .read_proc("uptime")
            .and_then(|content| system::parse_uptime(&content));
        let load = system::load_average().map(|[one, five, fifteen]| {
            json!({ "1m": one, "5m": five, "15m": fifteen })
        });

        let mut snapshot = Snapshot::new();
        snapshot.insert("memory".into(), self.memory());
        snapshot.insert("load_average".into(), json!(load));
        snapshot.insert("disk".into(), self.disk()?);
        snapshot.insert("uptime_seconds".into(), json!(uptime));
        snapshot.insert(
            "cgroup".into(),
            ResourceLimits::read_from(&self.cgroup_root).to_json(),
        );
        Ok(snapshot)
    }

    fn state(&self) -> &ProviderState {
        &self.state
    }
}
