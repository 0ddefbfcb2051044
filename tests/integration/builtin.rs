//! Built-in providers wired the way the binary wires them.

use std::sync::Arc;

use sysdiag::config::{Config, EnvSource};
use sysdiag::diagnostics::{
    CachedCollector, DiagnosticsCollector, DiagnosticsLevel, DiagnosticsProvider,
    DiagnosticsResponse, ProviderRegistry, Selection, SystemCollector,
};
use sysdiag::observability::EngineMetrics;
use sysdiag::providers;
use tempfile::TempDir;

struct Engine {
    _project: TempDir,
    metrics: Arc<EngineMetrics>,
    collector: SystemCollector,
}

fn engine(app_env: &str) -> Engine {
    let project = TempDir::new().unwrap();
    let env = EnvSource::from_pairs([
        ("APP_NAME", "inventory".to_string()),
        ("APP_ENV", app_env.to_string()),
        ("PROJECT_DIR", project.path().display().to_string()),
    ]);
    let config = Config::from_source(&env).unwrap();
    let metrics = Arc::new(EngineMetrics::new().unwrap());
    let registry = ProviderRegistry::new(providers::builtin(&config, &metrics)).unwrap();
    let collector = SystemCollector::new(Arc::new(registry)).with_metrics(Arc::clone(&metrics));

    Engine {
        _project: project,
        metrics,
        collector,
    }
}

#[tokio::test]
async fn test_basic_level_response() {
    let engine = engine("prod");
    let available = engine.collector.available_providers();

    let response = DiagnosticsResponse::collect(
        &engine.collector,
        &DiagnosticsLevel::Basic.resolve(&available),
    )
    .await
    .unwrap();
    let json = serde_json::to_value(&response).unwrap();

    let diagnostics = json["diagnostics"].as_object().unwrap();
    assert_eq!(
        diagnostics.keys().collect::<Vec<_>>(),
        vec!["runtime", "environment"]
    );
    assert_eq!(json["diagnostics"]["environment"]["environment"], "prod");
    assert_eq!(json["diagnostics"]["environment"]["debug_mode"], false);
    assert_eq!(
        json["diagnostics"]["environment"]["cache_directory_writable"],
        true
    );
    assert_eq!(
        json["metadata"]["available_providers"],
        serde_json::json!(["runtime", "application", "environment", "system", "metrics"])
    );
    assert!(json["metadata"]["timestamp"].as_u64().unwrap() > 0);
    assert!(json["executionTime"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_full_collection_has_no_failures() {
    let engine = engine("dev");

    let report = engine.collector.collect(&Selection::all()).await.unwrap();

    assert_eq!(report.len(), 5);
    assert_eq!(report.failure_count(), 0, "report: {:?}", report);
    let application = report.get("application").unwrap().snapshot().unwrap();
    assert_eq!(application["name"], "inventory");
}

#[tokio::test]
async fn test_metrics_provider_sees_previous_runs() {
    let engine = engine("dev");
    engine
        .collector
        .collect(&Selection::only(["runtime"]))
        .await
        .unwrap();

    let report = engine
        .collector
        .collect(&Selection::only(["metrics"]))
        .await
        .unwrap();
    let metrics = report.get("metrics").unwrap().snapshot().unwrap();

    assert_eq!(metrics["sysdiag_collections_total"], 1.0);
    assert_eq!(
        metrics["sysdiag_provider_runs_total{outcome=\"ok\",provider=\"runtime\"}"],
        1.0
    );
    assert_eq!(engine.metrics.collections_total.get(), 2);
}

#[tokio::test]
async fn test_disabled_builtin_is_skipped() {
    let engine = engine("dev");
    engine
        .collector
        .registry()
        .get("system")
        .unwrap()
        .set_enabled(false);

    let cached = CachedCollector::in_memory(engine.collector);
    let report = cached.collect(&Selection::all()).await.unwrap();

    assert!(!report.contains_key("system"));
    assert_eq!(report.len(), 4);
}
