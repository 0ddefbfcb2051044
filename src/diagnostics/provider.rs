//! Provider abstraction.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use super::error::ProviderError;
use super::types::Snapshot;

/// A self-contained unit producing one named slice of diagnostic data.
///
/// Providers live behind `Arc` in the registry and are shared with blocking
/// tasks during collection, so runtime toggles go through [`ProviderState`]
/// and take `&self`.
pub trait DiagnosticsProvider: Send + Sync + 'static {
    /// Unique, stable key (e.g. "runtime", "system").
    fn key(&self) -> &str;

    /// Take a fresh snapshot. Called on every collection; never cached here.
    ///
    /// May block on I/O. The collector runs it on the blocking pool.
    fn diagnostics(&self) -> Result<Snapshot, ProviderError>;

    /// Enabled flag and priority.
    fn state(&self) -> &ProviderState;

    #[inline]
    fn is_enabled(&self) -> bool {
        self.state().is_enabled()
    }

    #[inline]
    fn set_enabled(&self, enabled: bool) {
        self.state().set_enabled(enabled);
    }

    /// Presentation priority, higher first. Does not affect collection.
    #[inline]
    fn priority(&self) -> i32 {
        self.state().priority()
    }
}

/// Mutable runtime attributes shared by every provider.
#[derive(Debug)]
pub struct ProviderState {
    enabled: AtomicBool,
    priority: AtomicI32,
}

impl ProviderState {
    /// Enabled, priority 0.
    pub fn new() -> Self {
        Self::with_priority(0)
    }

    pub fn with_priority(priority: i32) -> Self {
        Self {
            enabled: AtomicBool::new(true),
            priority: AtomicI32::new(priority),
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    #[inline]
    pub fn priority(&self) -> i32 {
        self.priority.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_priority(&self, priority: i32) {
        self.priority.store(priority, Ordering::Relaxed);
    }
}

impl Default for ProviderState {
    fn default() -> Self {
        Self::new()
    }
}

/// Provider backed by a closure.
///
/// Handy for ad-hoc sources that do not warrant their own type.
///
/// ```rust,ignore
/// let provider = FnProvider::new("php", || {
///     let mut snapshot = Snapshot::new();
///     snapshot.insert("version".into(), "8.3".into());
///     Ok(snapshot)
/// });
/// ```
pub struct FnProvider<F> {
    key: String,
    state: ProviderState,
    produce: F,
}

impl<F> FnProvider<F>
where
    F: Fn() -> Result<Snapshot, ProviderError> + Send + Sync + 'static,
{
    pub fn new(key: impl Into<String>, produce: F) -> Self {
        Self {
            key: key.into(),
            state: ProviderState::new(),
            produce,
        }
    }

    /// Start disabled.
    pub fn disabled(self) -> Self {
        self.state.set_enabled(false);
        self
    }

    pub fn with_priority(self, priority: i32) -> Self {
        self.state.set_priority(priority);
        self
    }
}

impl<F> DiagnosticsProvider for FnProvider<F>
where
    F: Fn() -> Result<Snapshot, ProviderError> + Send + Sync + 'static,
{
    fn key(&self) -> &str {
        &self.key
    }

    fn diagnostics(&self) -> Result<Snapshot, ProviderError> {
        (self.produce)()
    }

    fn state(&self) -> &ProviderState {
        &self.state
    }
}
