//! Cache decorator over a real collector.

use std::sync::Arc;
use std::time::Duration;

use sysdiag::diagnostics::{
    CachedCollector, DiagnosticsCollector, MemoryCache, Selection, SystemCollector,
};
use sysdiag::observability::EngineMetrics;

use crate::helpers::*;

#[tokio::test(start_paused = true)]
async fn test_identical_calls_within_ttl_hit_cache() {
    let counted = Counted::new("php");
    let inner = SystemCollector::new(registry(vec![Arc::clone(&counted.provider)]));
    let cached = CachedCollector::new(inner, MemoryCache::new(), Duration::from_secs(60));

    let first = cached.collect(&Selection::all()).await.unwrap();
    let second = cached.collect(&Selection::all()).await.unwrap();

    assert_eq!(to_json(&first), to_json(&second));
    assert_eq!(counted.runs(), 1);

    tokio::time::advance(Duration::from_secs(61)).await;

    let third = cached.collect(&Selection::all()).await.unwrap();
    assert_eq!(counted.runs(), 2);
    assert_eq!(to_json(&third)["php"]["run"], 2);
}

#[tokio::test(start_paused = true)]
async fn test_key_order_gives_separate_entries() {
    let a = Counted::new("a");
    let b = Counted::new("b");
    let inner = SystemCollector::new(registry(vec![
        Arc::clone(&a.provider),
        Arc::clone(&b.provider),
    ]));
    let cached = CachedCollector::in_memory(inner);

    cached.collect(&Selection::only(["a", "b"])).await.unwrap();
    cached.collect(&Selection::only(["b", "a"])).await.unwrap();
    cached.collect(&Selection::only(["a", "b"])).await.unwrap();

    assert_eq!(a.runs(), 2);
    assert_eq!(b.runs(), 2);
    assert_eq!(cached.store().len().unwrap(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_selection_is_not_cached() {
    let counted = Counted::new("a");
    let inner = SystemCollector::new(registry(vec![Arc::clone(&counted.provider)]));
    let cached = CachedCollector::in_memory(inner);

    let selection = Selection::only(["nope"]);
    assert!(cached.collect(&selection).await.is_err());
    assert!(cached.collect(&selection).await.is_err());

    assert!(cached.store().is_empty().unwrap());
    assert_eq!(counted.runs(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failures_are_cached_with_the_report() {
    let inner = SystemCollector::new(registry(vec![failing_provider("broken", "boom")]));
    let cached = CachedCollector::in_memory(inner);

    let first = cached.collect(&Selection::all()).await.unwrap();
    let second = cached.collect(&Selection::all()).await.unwrap();

    assert_eq!(first.failure_count(), 1);
    assert_eq!(to_json(&first), to_json(&second));
}

#[tokio::test(start_paused = true)]
async fn test_invalidate_forces_refresh() {
    let counted = Counted::new("php");
    let inner = SystemCollector::new(registry(vec![Arc::clone(&counted.provider)]));
    let cached = CachedCollector::in_memory(inner);

    cached.collect(&Selection::all()).await.unwrap();
    cached.invalidate(&Selection::all()).unwrap();
    cached.collect(&Selection::all()).await.unwrap();

    assert_eq!(counted.runs(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cache_lookups_are_counted() {
    let metrics = Arc::new(EngineMetrics::new().unwrap());
    let inner = SystemCollector::new(registry(vec![static_provider("php", "8.3")]))
        .with_metrics(Arc::clone(&metrics));
    let cached = CachedCollector::in_memory(inner).with_metrics(Arc::clone(&metrics));

    cached.collect(&Selection::all()).await.unwrap();
    cached.collect(&Selection::all()).await.unwrap();
    cached.collect(&Selection::all()).await.unwrap();

    let lookups = |result: &str| {
        metrics
            .cache_lookups_total
            .with_label_values(&[result])
            .get()
    };
    assert_eq!(lookups("miss"), 1.0);
    assert_eq!(lookups("hit"), 2.0);
    assert_eq!(metrics.collections_total.get(), 1);
}

#[tokio::test]
async fn test_available_providers_passes_through() {
    let inner = SystemCollector::new(registry(vec![
        static_provider("a", "1"),
        static_provider("b", "1"),
    ]));
    let cached = CachedCollector::in_memory(inner);

    assert_eq!(cached.available_providers(), vec!["a", "b"]);
    assert!(cached.store().is_empty().unwrap());
}
