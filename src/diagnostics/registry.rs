//! Provider registry.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::error::RegistryError;
use super::provider::DiagnosticsProvider;

/// Read-only index of every provider by key, built once at startup.
///
/// Iteration follows registration order.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn DiagnosticsProvider>>,
    index: HashMap<String, usize>,
}

impl ProviderRegistry {
    /// Register the full provider set.
    ///
    /// Duplicate or empty keys are configuration errors.
    pub fn new<I>(providers: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = Arc<dyn DiagnosticsProvider>>,
    {
        let mut registry = Self {
            providers: Vec::new(),
            index: HashMap::new(),
        };

        for provider in providers {
            let key = provider.key().to_string();
            if key.is_empty() {
                return Err(RegistryError::EmptyKey);
            }
            if registry.index.contains_key(&key) {
                return Err(RegistryError::DuplicateKey(key));
            }

            debug!(provider = %key, enabled = provider.is_enabled(), "Registered diagnostics provider");
            registry.index.insert(key, registry.providers.len());
            registry.providers.push(provider);
        }

        Ok(registry)
    }

    pub fn get(&self, key: &str) -> Option<&Arc<dyn DiagnosticsProvider>> {
        self.index.get(key).map(|&i| &self.providers[i])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// All registered keys in registration order, regardless of enabled state.
    pub fn keys(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.key().to_string()).collect()
    }

    /// Keys ordered by priority (highest first), ties in registration order.
    pub fn keys_by_priority(&self) -> Vec<String> {
        let mut sorted: Vec<&Arc<dyn DiagnosticsProvider>> = self.providers.iter().collect();
        sorted.sort_by_key(|p| std::cmp::Reverse(p.priority()));
        sorted.into_iter().map(|p| p.key().to_string()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn DiagnosticsProvider>> {
        self.providers.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.keys())
            .finish()
    }
}
