//! Time-bounded caching decorator for collectors.
//!
//! Results are memoized per exact selection list: `[]`, `["a","b"]` and
//! `["b","a"]` are three different entries. Errors are never cached.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::trace;

use super::collector::DiagnosticsCollector;
use super::error::{CacheError, DiagnosticsError};
use super::selection::Selection;
use super::types::DiagnosticsReport;
use crate::observability::EngineMetrics;

/// Default time-to-live for cached reports.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Storage behind [`CachedCollector`].
///
/// Failures propagate to the caller unchanged.
pub trait CacheStore: Send + Sync {
    /// Fetch a live entry. Expired entries read as `None`.
    fn get(&self, key: &str) -> Result<Option<DiagnosticsReport>, CacheError>;

    /// Store an entry that expires after `ttl`.
    fn put(&self, key: String, report: DiagnosticsReport, ttl: Duration) -> Result<(), CacheError>;

    fn remove(&self, key: &str) -> Result<(), CacheError>;

    fn clear(&self) -> Result<(), CacheError>;
}

struct CacheEntry {
    report: DiagnosticsReport,
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl CacheEntry {
    #[inline]
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// Default entry cap for [`MemoryCache`].
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// In-process cache store.
///
/// Thread-safe with RwLock. Expired entries are dropped on lookup, on every
/// insert, or by [`MemoryCache::purge_expired`]. At capacity, the entry
/// closest to expiry is evicted.
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    capacity: usize,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Store at most `capacity` entries (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: RwLock::new(HashMap::with_capacity(capacity)),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> Result<usize, CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        Ok(before - entries.len())
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> Result<usize, CacheError> {
        Ok(self.entries.read().map_err(|_| CacheError::Poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len()? == 0)
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<DiagnosticsReport>, CacheError> {
        let now = Instant::now();

        // Fast path: live entry under the read lock
        {
            let entries = self.entries.read().map_err(|_| CacheError::Poisoned)?;
            match entries.get(key) {
                Some(entry) if entry.is_live(now) => return Ok(Some(entry.report.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: evict unless another caller refreshed it meanwhile
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    fn put(&self, key: String, report: DiagnosticsReport, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let entry = CacheEntry {
            report,
            expires_at: now.checked_add(ttl),
        };

        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        entries.retain(|_, entry| entry.is_live(now));

        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            // Soonest to expire goes first; never-expiring entries sort last
            let victim = entries
                .iter()
                .min_by_key(|(_, e)| (e.expires_at.is_none(), e.expires_at))
                .map(|(k, _)| k.clone());
            if let Some(victim) = victim {
                trace!(cache_key = %victim, "Diagnostics cache full, evicting");
                entries.remove(&victim);
            }
        }

        entries.insert(key, entry);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries
            .write()
            .map_err(|_| CacheError::Poisoned)?
            .remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.entries
            .write()
            .map_err(|_| CacheError::Poisoned)?
            .clear();
        Ok(())
    }
}

/// Cache key for a selection: order- and emptiness-sensitive.
pub fn cache_key(selection: &Selection) -> String {
    let keys = serde_json::Value::from(selection.keys().to_vec());
    format!("diagnostics_{}", keys)
}

/// Collector decorator that memoizes reports for a fixed TTL.
///
/// Concurrent misses for the same selection each run the inner collector.
pub struct CachedCollector<C, S = MemoryCache> {
    inner: C,
    store: S,
    ttl: Duration,
    metrics: Option<Arc<EngineMetrics>>,
}

impl<C: DiagnosticsCollector> CachedCollector<C, MemoryCache> {
    /// In-memory cache with the default TTL (300s).
    pub fn in_memory(inner: C) -> Self {
        Self::new(inner, MemoryCache::new(), DEFAULT_CACHE_TTL)
    }
}

impl<C: DiagnosticsCollector, S: CacheStore> CachedCollector<C, S> {
    pub fn new(inner: C, store: S, ttl: Duration) -> Self {
        Self {
            inner,
            store,
            ttl,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<EngineMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Forget the cached report for one selection.
    pub fn invalidate(&self, selection: &Selection) -> Result<(), DiagnosticsError> {
        self.store.remove(&cache_key(selection))?;
        Ok(())
    }

    /// Forget every cached report.
    pub fn clear(&self) -> Result<(), DiagnosticsError> {
        self.store.clear()?;
        Ok(())
    }
}

#[async_trait]
impl<C: DiagnosticsCollector, S: CacheStore> DiagnosticsCollector for CachedCollector<C, S> {
    async fn collect(&self, selection: &Selection) -> Result<DiagnosticsReport, DiagnosticsError> {
        let key = cache_key(selection);

        if let Some(report) = self.store.get(&key)? {
            trace!(cache_key = %key, "Diagnostics cache hit");
            if let Some(ref metrics) = self.metrics {
                metrics.record_cache(true);
            }
            return Ok(report);
        }

        trace!(cache_key = %key, "Diagnostics cache miss");
        if let Some(ref metrics) = self.metrics {
            metrics.record_cache(false);
        }

        let report = self.inner.collect(selection).await?;
        self.store.put(key, report.clone(), self.ttl)?;
        Ok(report)
    }

    fn available_providers(&self) -> Vec<String> {
        self.inner.available_providers()
    }
}
