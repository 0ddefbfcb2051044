//! Cgroup detection and resource limit parsing.
//!
//! Supports both cgroup v1 and v2 for detecting CPU, memory and PIDs limits
//! in containerized environments (Docker, Kubernetes).

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tracing::{debug, trace};

/// Default cgroup filesystem mount point.
pub const CGROUP_ROOT: &str = "/sys/fs/cgroup";

/// cgroup v1 reports "unlimited" memory as a value close to i64::MAX.
const V1_UNLIMITED_THRESHOLD: u64 = 9_000_000_000_000_000_000;

/// Cgroup version detected on the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CgroupVersion {
    /// cgroup v2 (unified hierarchy)
    V2,
    /// cgroup v1 (legacy hierarchy)
    V1,
    /// No cgroup detected (bare metal or unsupported)
    None,
}

impl CgroupVersion {
    /// Detect the cgroup version under `root`.
    pub fn detect(root: &Path) -> Self {
        if root.join("cgroup.controllers").exists() {
            debug!("Detected cgroup v2 (unified hierarchy)");
            return Self::V2;
        }

        if root.join("memory/memory.limit_in_bytes").exists()
            || root.join("cpu/cpu.cfs_quota_us").exists()
        {
            debug!("Detected cgroup v1 (legacy hierarchy)");
            return Self::V1;
        }

        debug!("No cgroup detected");
        Self::None
    }
}

impl std::fmt::Display for CgroupVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V2 => write!(f, "v2"),
            Self::V1 => write!(f, "v1"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Resource limits detected from cgroup.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceLimits {
    pub version: CgroupVersion,
    /// Memory limit in bytes (None = unlimited)
    pub memory_limit: Option<u64>,
    /// CPU quota as fraction (e.g., 2.0 = 2 CPUs)
    pub cpu_quota: Option<f64>,
    pub pids_max: Option<u32>,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            version: CgroupVersion::None,
            memory_limit: None,
            cpu_quota: None,
            pids_max: None,
        }
    }
}

impl ResourceLimits {
    /// Read limits from the system cgroup mount.
    pub fn from_cgroup() -> Self {
        Self::read_from(Path::new(CGROUP_ROOT))
    }

    /// Read limits from a cgroup hierarchy rooted at `root`.
    pub fn read_from(root: &Path) -> Self {
        let reader = Reader {
            root: root.to_path_buf(),
        };
        match CgroupVersion::detect(root) {
            CgroupVersion::V2 => reader.v2(),
            CgroupVersion::V1 => reader.v1(),
            CgroupVersion::None => Self::default(),
        }
    }

    /// JSON view for diagnostic snapshots.
    pub fn to_json(&self) -> Value {
        json!({
            "version": self.version.to_string(),
            "memory_limit": self.memory_limit,
            "cpu_quota": self.cpu_quota,
            "pids_max": self.pids_max,
        })
    }
}

struct Reader {
    root: PathBuf,
}

impl Reader {
    fn read(&self, rel: &str) -> Option<String> {
        fs::read_to_string(self.root.join(rel))
            .ok()
            .map(|s| s.trim().to_string())
    }

    /// Parse a value where "max" means unlimited.
    fn read_limit<T: std::str::FromStr>(&self, rel: &str) -> Option<T> {
        self.read(rel)
            .filter(|s| s != "max")
            .and_then(|s| s.parse().ok())
    }

    fn v2(&self) -> ResourceLimits {
        let memory_limit = self.read_limit::<u64>("memory.max");
        trace!(?memory_limit, "cgroup v2 memory.max");

        // Format: "$MAX $PERIOD" or "max $PERIOD"
        let cpu_quota = self.read("cpu.max").and_then(|content| {
            let mut parts = content.split_whitespace();
            let max = parts.next()?.parse::<f64>().ok()?;
            let period = parts.next()?.parse::<f64>().ok()?;
            (period > 0.0).then(|| max / period)
        });
        trace!(?cpu_quota, "cgroup v2 cpu.max");

        ResourceLimits {
            version: CgroupVersion::V2,
            memory_limit,
            cpu_quota,
            pids_max: self.read_limit("pids.max"),
        }
    }

    fn v1(&self) -> ResourceLimits {
        let memory_limit = self
            .read_limit::<u64>("memory/memory.limit_in_bytes")
            .filter(|&v| v < V1_UNLIMITED_THRESHOLD);

        // Negative quota means unlimited
        let quota = self.read_limit::<i64>("cpu/cpu.cfs_quota_us");
        let period = self.read_limit::<f64>("cpu/cpu.cfs_period_us");
        let cpu_quota = match (quota, period) {
            (Some(q), Some(p)) if q > 0 && p > 0.0 => Some(q as f64 / p),
            _ => None,
        };
        trace!(?memory_limit, ?cpu_quota, "cgroup v1 limits");

        ResourceLimits {
            version: CgroupVersion::V1,
            memory_limit,
            cpu_quota,
            pids_max: self.read_limit("pids/pids.max"),
        }
    }
}
