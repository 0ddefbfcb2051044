use std::process::ExitCode;
use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, warn};

use sysdiag::config::Config;
use sysdiag::diagnostics::{
    CachedCollector, DiagnosticsCollector, DiagnosticsError, DiagnosticsLevel, DiagnosticsProvider,
    DiagnosticsResponse, MemoryCache, ProviderOutcome, ProviderRegistry, Selection, SystemCollector,
};
use sysdiag::observability::EngineMetrics;
use sysdiag::{logging, providers};

/// Exit code for an unknown provider key.
const EXIT_INVALID_PROVIDER: u8 = 2;

/// Exit code for malformed arguments.
const EXIT_USAGE: u8 = 64;

fn main() -> Result<ExitCode, Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;
    logging::init(&config.logging);

    info!("Starting sysdiag {}", sysdiag::VERSION);
    config.log_summary();

    // Providers block on I/O in spawn_blocking; one scheduler thread is enough
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config))
}

async fn async_main(
    config: Config,
) -> Result<ExitCode, Box<dyn std::error::Error + Send + Sync>> {
    let metrics = Arc::new(EngineMetrics::new()?);
    let registry = Arc::new(ProviderRegistry::new(providers::builtin(
        &config, &metrics,
    ))?);

    for key in &config.diagnostics.disabled {
        match registry.get(key) {
            Some(provider) => {
                provider.set_enabled(false);
                info!(provider = %key, "Provider disabled");
            }
            None => warn!(provider = %key, "DIAGNOSTICS_DISABLED names an unknown provider"),
        }
    }

    let collector = SystemCollector::new(Arc::clone(&registry))
        .with_timeout(config.diagnostics.provider_timeout)
        .with_metrics(Arc::clone(&metrics));

    let collector: Box<dyn DiagnosticsCollector> = match config.diagnostics.cache_ttl {
        Some(ttl) => Box::new(
            CachedCollector::new(collector, MemoryCache::new(), ttl).with_metrics(metrics),
        ),
        None => Box::new(collector),
    };

    let invocation = match Invocation::parse(std::env::args().skip(1), &registry.keys()) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(ExitCode::from(EXIT_USAGE));
        }
    };

    match DiagnosticsResponse::collect(collector.as_ref(), &invocation.selection).await {
        Ok(response) if invocation.text => {
            print!("{}", render_text(&response));
            Ok(ExitCode::SUCCESS)
        }
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e @ DiagnosticsError::UnknownProvider { .. }) => {
            eprintln!("{}", e);
            if let Some(available) = e.available_providers() {
                eprintln!("Available providers: {}", available.join(", "));
            }
            Ok(ExitCode::from(EXIT_INVALID_PROVIDER))
        }
        Err(e) => {
            error!(error = %e, "Diagnostics collection failed");
            eprintln!("Diagnostics collection failed: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Parsed command line.
#[derive(Debug)]
struct Invocation {
    selection: Selection,
    /// One section per provider instead of JSON
    text: bool,
}

impl Invocation {
    /// `[--text] [--level=basic|full | KEY...]`; no keys means all enabled.
    fn parse(args: impl Iterator<Item = String>, available: &[String]) -> Result<Self, String> {
        let mut text = false;
        let mut level = None;
        let mut keys = Vec::new();

        for arg in args {
            if arg == "--text" {
                text = true;
            } else if let Some(value) = arg.strip_prefix("--level=") {
                level = Some(value.parse::<DiagnosticsLevel>()?);
            } else if arg.starts_with("--") {
                return Err(format!("unknown option '{}'", arg));
            } else {
                keys.push(arg);
            }
        }

        let selection = match level {
            Some(_) if !keys.is_empty() => {
                return Err("--level cannot be combined with provider keys".to_string())
            }
            Some(level) => level.resolve(available),
            None => Selection::from(keys),
        };

        Ok(Self { selection, text })
    }
}

/// Human-readable report: a section per provider, failures as one error line.
fn render_text(response: &DiagnosticsResponse) -> String {
    let mut out = String::new();

    for (key, outcome) in response.diagnostics.iter() {
        out.push_str(&format!("[{}]\n", key));
        match outcome {
            ProviderOutcome::Snapshot(snapshot) => {
                for (field, value) in snapshot {
                    let rendered = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    out.push_str(&format!("  {}: {}\n", field, rendered));
                }
            }
            ProviderOutcome::Failed(failure) => {
                out.push_str(&format!("  ERROR: {}\n", failure.message()));
            }
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "Collected {} provider(s), {} failed, in {:.3}s\n",
        response.diagnostics.len(),
        response.diagnostics.failure_count(),
        response.execution_time
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sysdiag::diagnostics::{DiagnosticsReport, ProviderFailure, ResponseMetadata, Snapshot};

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    fn parse(list: &[&str]) -> Result<Invocation, String> {
        let available = vec!["runtime".to_string(), "system".to_string()];
        Invocation::parse(args(list), &available)
    }

    #[test]
    fn test_invocation_selection() {
        assert!(parse(&[]).unwrap().selection.is_all());
        assert_eq!(
            parse(&["system", "runtime"]).unwrap().selection.keys(),
            ["system", "runtime"]
        );
        assert_eq!(
            parse(&["--level=full"]).unwrap().selection.keys(),
            ["runtime", "system"]
        );
        assert_eq!(
            parse(&["--level=basic"]).unwrap().selection.keys(),
            ["runtime", "environment"]
        );
        assert!(parse(&["--level=loud"]).is_err());
        assert!(parse(&["--level=full", "system"]).is_err());
        assert!(parse(&["--verbose"]).is_err());
    }

    #[test]
    fn test_invocation_text_flag() {
        let invocation = parse(&["--text", "system"]).unwrap();
        assert!(invocation.text);
        assert_eq!(invocation.selection.keys(), ["system"]);
        assert!(!parse(&[]).unwrap().text);
    }

    #[test]
    fn test_render_text_sections() {
        let mut snapshot = Snapshot::new();
        snapshot.insert("version".into(), "8.3".into());
        snapshot.insert("debug".into(), true.into());

        let mut report = DiagnosticsReport::new();
        report.insert("php", ProviderOutcome::Snapshot(snapshot));
        report.insert(
            "broken",
            ProviderOutcome::Failed(ProviderFailure::new("broken", "boom")),
        );

        let response = DiagnosticsResponse {
            diagnostics: report,
            metadata: ResponseMetadata {
                timestamp: 0,
                available_providers: vec!["php".into(), "broken".into()],
            },
            execution_time: 0.25,
        };

        assert_eq!(
            render_text(&response),
            "[php]\n  version: 8.3\n  debug: true\n\n\
             [broken]\n  ERROR: Diagnostics error in provider \"broken\": boom\n\n\
             Collected 2 provider(s), 1 failed, in 0.250s\n"
        );
    }
}
