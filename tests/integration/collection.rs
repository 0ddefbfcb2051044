//! Collection behavior through the public API.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use sysdiag::diagnostics::{
    DiagnosticsCollector, DiagnosticsError, DiagnosticsLevel, DiagnosticsProvider, FnProvider,
    ProviderError, ProviderRegistry, RegistryError, Selection, Snapshot, SystemCollector,
};

use crate::helpers::*;

#[tokio::test]
async fn test_failing_provider_is_isolated() {
    let registry = registry(vec![
        static_provider("php", "8.3"),
        failing_provider("broken", "boom"),
    ]);
    let collector = SystemCollector::new(registry);

    let report = collector.collect(&Selection::all()).await.unwrap();

    assert_eq!(
        to_json(&report),
        json!({
            "php": {"version": "8.3"},
            "broken": {"error": "Diagnostics error in provider \"broken\": boom"},
        })
    );
    assert_eq!(report.failure_count(), 1);
}

#[tokio::test]
async fn test_disabled_provider_skipped_unless_named() {
    let a = static_provider("a", "1");
    let b = static_provider("b", "2");
    b.set_enabled(false);
    let collector = SystemCollector::new(registry(vec![a, b]));

    let implicit = collector.collect(&Selection::all()).await.unwrap();
    assert_eq!(report_keys(&implicit), vec!["a"]);

    let explicit = collector
        .collect(&Selection::only(["a", "b"]))
        .await
        .unwrap();
    assert_eq!(report_keys(&explicit), vec!["a", "b"]);
}

#[tokio::test]
async fn test_unknown_provider_rejects_whole_call() {
    let counted = Counted::new("a");
    let collector = SystemCollector::new(registry(vec![Arc::clone(&counted.provider)]));

    let err = collector
        .collect(&Selection::only(["a", "missing"]))
        .await
        .unwrap_err();

    assert!(err.is_invalid_input());
    assert_eq!(err.to_string(), "Invalid diagnostics provider: \"missing\"");
    match &err {
        DiagnosticsError::UnknownProvider { key, available } => {
            assert_eq!(key, "missing");
            assert_eq!(available, &vec!["a".to_string()]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(counted.runs(), 0, "no provider may run on rejected selection");
}

#[tokio::test]
async fn test_explicit_selection_keeps_order() {
    let collector = SystemCollector::new(registry(vec![
        static_provider("a", "1"),
        static_provider("b", "2"),
        static_provider("c", "3"),
    ]));

    let report = collector
        .collect(&Selection::only(["c", "a"]))
        .await
        .unwrap();
    assert_eq!(report_keys(&report), vec!["c", "a"]);

    let serialized = serde_json::to_string(&report).unwrap();
    assert!(serialized.find("\"c\"").unwrap() < serialized.find("\"a\"").unwrap());
}

#[tokio::test]
async fn test_available_providers_ignores_enabled_flag() {
    let a = static_provider("a", "1");
    a.set_enabled(false);
    let collector = SystemCollector::new(registry(vec![a, static_provider("b", "2")]));

    assert_eq!(collector.available_providers(), vec!["a", "b"]);
}

#[tokio::test]
async fn test_panic_and_timeout_do_not_sink_collection() {
    let panicking: Arc<dyn DiagnosticsProvider> = Arc::new(FnProvider::new(
        "panics",
        || -> Result<Snapshot, ProviderError> { panic!("provider exploded") },
    ));
    let slow: Arc<dyn DiagnosticsProvider> = Arc::new(FnProvider::new("slow", || {
        std::thread::sleep(Duration::from_millis(500));
        Ok(Snapshot::new())
    }));

    let collector = SystemCollector::new(registry(vec![
        panicking,
        slow,
        static_provider("ok", "1"),
    ]))
    .with_timeout(Some(Duration::from_millis(50)));

    let report = collector.collect(&Selection::all()).await.unwrap();

    assert_eq!(report_keys(&report), vec!["panics", "slow", "ok"]);
    let json = to_json(&report);
    assert!(json["panics"]["error"]
        .as_str()
        .unwrap()
        .contains("provider exploded"));
    assert!(json["slow"]["error"].as_str().unwrap().contains("timed out"));
    assert_eq!(json["ok"], json!({"version": "1"}));
}

#[tokio::test]
async fn test_levels_resolve_against_registry() {
    let runtime = static_provider("runtime", "1");
    let environment = static_provider("environment", "1");
    let system = static_provider("system", "1");
    system.set_enabled(false);
    let collector = SystemCollector::new(registry(vec![runtime, environment, system]));
    let available = collector.available_providers();

    let basic = collector
        .collect(&DiagnosticsLevel::Basic.resolve(&available))
        .await
        .unwrap();
    assert_eq!(report_keys(&basic), vec!["runtime", "environment"]);

    // Full names every key, so disabled providers run too
    let full = collector
        .collect(&DiagnosticsLevel::Full.resolve(&available))
        .await
        .unwrap();
    assert_eq!(report_keys(&full), vec!["runtime", "environment", "system"]);
}

#[test]
fn test_duplicate_keys_rejected() {
    let result = ProviderRegistry::new(vec![
        static_provider("php", "8.2"),
        static_provider("php", "8.3"),
    ]);
    assert!(matches!(result, Err(RegistryError::DuplicateKey(ref k)) if k == "php"));
}
