//! System resource detection used by the built-in providers.
//!
//! # Cgroup Support
//!
//! - **cgroup v2**: Modern unified hierarchy (default on newer kernels)
//! - **cgroup v1**: Legacy hierarchy (still common in production)
//!
//! # Example
//!
//! ```rust,ignore
//! use sysdiag::system::ResourceLimits;
//!
//! let limits = ResourceLimits::from_cgroup();
//! println!("CPU quota: {:?}", limits.cpu_quota);
//! ```

mod cgroup;
mod proc;

pub use cgroup::{CgroupVersion, ResourceLimits, CGROUP_ROOT};
pub use proc::{disk_space, load_average, parse_status_kb, parse_uptime, DiskSpace};
