//! Deployment environment and writable directories.

use std::fs;
use std::path::Path;

use serde_json::json;
use tracing::debug;

use crate::config::ApplicationConfig;
use crate::diagnostics::{DiagnosticsProvider, ProviderError, ProviderState, Snapshot};

/// Reports the environment name, debug mode, and whether the cache and log
/// directories under the project are writable.
///
/// Missing directories are created on each run.
pub struct EnvironmentProvider {
    state: ProviderState,
    config: ApplicationConfig,
}

impl EnvironmentProvider {
    pub const KEY: &'static str = "environment";

    pub fn new(config: &ApplicationConfig) -> Self {
        Self {
            state: ProviderState::with_priority(80),
            config: config.clone(),
        }
    }
}

impl DiagnosticsProvider for EnvironmentProvider {
    fn key(&self) -> &str {
        Self::KEY
    }

    fn diagnostics(&self) -> Result<Snapshot, ProviderError> {
        let mut snapshot = Snapshot::new();
        snapshot.insert("environment".into(), json!(self.config.environment));
        snapshot.insert("debug_mode".into(), json!(self.config.debug_mode()));
        snapshot.insert(
            "project_dir".into(),
            json!(self.config.project_dir.display().to_string()),
        );
        snapshot.insert(
            "cache_directory_writable".into(),
            json!(ensure_writable(&self.config.cache_dir())),
        );
        snapshot.insert(
            "logs_directory_writable".into(),
            json!(ensure_writable(&self.config.log_dir())),
        );
        Ok(snapshot)
    }

    fn state(&self) -> &ProviderState {
        &self.state
    }
}

/// Create `dir` if needed and report whether this process may write to it.
fn ensure_writable(dir: &Path) -> bool {
    if !dir.is_dir() {
        if let Err(e) = fs::create_dir_all(dir) {
            debug!(path = %dir.display(), error = %e, "Cannot create directory");
        }
    }
    dir.is_dir() && is_writable(dir)
}

#[cfg(unix)]
fn is_writable(path: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: c_path is a valid NUL-terminated string for the call's duration
    unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
}

#[cfg(not(unix))]
fn is_writable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| !m.permissions().readonly())
        .unwrap_or(false)
}
