//! Typed load/store over a byte backend.
//!
//! This is where the self-healing policy lives: an entry that cannot be read
//! or decoded is logged, counted and reported as absent, so the caller
//! regenerates and overwrites it.

use std::sync::RwLock;

use erdos_core::{Bound, ErdosError, ErdosResult};

use super::entry::CacheEntry;
use super::key::CacheKey;
use super::traits::{CacheBackend, CacheStats, CachedSet};

/// Exact-key persistent cache of generated sets.
pub struct PersistentCache<B: CacheBackend> {
    backend: B,
    stats: RwLock<CacheStats>,
}

impl<B: CacheBackend> PersistentCache<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            stats: RwLock::new(CacheStats::default()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load the set of type `T` cached for exactly `bound`.
    ///
    /// Returns `None` when there is no entry, and also when the entry is
    /// unreadable or fails validation.
    pub fn load<T: CachedSet>(&self, bound: Bound) -> Option<T> {
        let key = CacheKey::new(T::KIND, bound);

        let bytes = match self.backend.read(&key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                self.record(|stats| stats.misses += 1);
                return None;
            }
            Err(e) => {
                tracing::warn!(
                    key = %key,
                    backend = self.backend.name(),
                    error = %e,
                    "unreadable cache entry, treating as miss"
                );
                self.record(|stats| {
                    stats.misses += 1;
                    stats.corrupted += 1;
                });
                return None;
            }
        };

        match CacheEntry::decode(&key, &bytes) {
            Ok(entry) => {
                self.record(|stats| stats.hits += 1);
                tracing::debug!(key = %key, count = entry.values.len(), "cache hit");
                Some(T::from_entry(bound, entry))
            }
            Err(e) => {
                tracing::warn!(
                    key = %key,
                    backend = self.backend.name(),
                    error = %e,
                    "corrupted cache entry, treating as miss"
                );
                self.record(|stats| {
                    stats.misses += 1;
                    stats.corrupted += 1;
                });
                None
            }
        }
    }

    /// Persist `set` under its own key, replacing any existing entry.
    pub fn store<T: CachedSet>(&self, set: &T) -> ErdosResult<()> {
        let key = set.cache_key();
        let result = set
            .to_entry()
            .encode(&key)
            .map_err(ErdosError::from)
            .and_then(|bytes| self.backend.write(&key, &bytes).map(|()| bytes.len()));

        match result {
            Ok(size_bytes) => {
                self.record(|stats| stats.stores += 1);
                tracing::info!(
                    key = %key,
                    backend = self.backend.name(),
                    size_bytes,
                    "stored cache entry"
                );
                Ok(())
            }
            Err(e) => {
                self.record(|stats| stats.store_failures += 1);
                Err(e)
            }
        }
    }

    /// Every key the backend currently holds.
    pub fn keys(&self) -> ErdosResult<Vec<CacheKey>> {
        self.backend.keys()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
            .read()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub(crate) fn record_generation(&self) {
        self.record(|stats| stats.generations += 1);
    }

    fn record(&self, update: impl FnOnce(&mut CacheStats)) {
        if let Ok(mut stats) = self.stats.write() {
            update(&mut stats);
        }
    }
}
