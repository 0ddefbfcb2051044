//! Built-in diagnostics providers.
//!
//! | Key           | Reports                                              |
//! |---------------|------------------------------------------------------|
//! | `runtime`     | package, build, target, pid, CPUs                    |
//! | `application` | application name and version                         |
//! | `environment` | environment name, debug mode, writable directories   |
//! | `system`      | memory, load, disk, uptime, cgroup limits            |
//! | `metrics`     | Prometheus samples, including the engine's own       |

mod application;
mod environment;
mod metrics;
mod runtime;
mod system;

use std::sync::Arc;

pub use application::ApplicationProvider;
pub use environment::EnvironmentProvider;
pub use metrics::MetricsProvider;
pub use runtime::RuntimeProvider;
pub use system::SystemResourceProvider;

use crate::config::Config;
use crate::diagnostics::DiagnosticsProvider;
use crate::observability::EngineMetrics;

/// The built-in providers in registration order.
pub fn builtin(config: &Config, metrics: &EngineMetrics) -> Vec<Arc<dyn DiagnosticsProvider>> {
    vec![
        Arc::new(RuntimeProvider::new(config.logging.filter.clone())),
        Arc::new(ApplicationProvider::new(&config.application)),
        Arc::new(EnvironmentProvider::new(&config.application)),
        Arc::new(SystemResourceProvider::new()),
        Arc::new(MetricsProvider::new(metrics.registry().clone())),
    ]
}
