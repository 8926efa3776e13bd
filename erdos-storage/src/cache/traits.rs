//! Cache backend traits and the cached-set marker.
//!
//! Backends move opaque bytes under a [`CacheKey`]; encoding and the
//! corruption policy live one layer up in [`PersistentCache`](super::PersistentCache).

use erdos_core::{Bound, ErdosResult, PrimeSet, SemiprimeSet, SetKind};

use super::entry::CacheEntry;
use super::key::CacheKey;

/// Marker trait for sets that can be cached.
///
/// # Implementation Requirements
///
/// - `KIND` must be the same for every instance
/// - `to_entry` must emit values in ascending order so identical sets
///   encode to identical bytes
/// - `from_entry` is only called with entries already checked against the key
pub trait CachedSet: Sized {
    /// The kind half of this set's cache key.
    const KIND: SetKind;

    /// The bound half of this set's cache key.
    fn bound(&self) -> Bound;

    fn to_entry(&self) -> CacheEntry;

    fn from_entry(bound: Bound, entry: CacheEntry) -> Self;

    fn cache_key(&self) -> CacheKey {
        CacheKey::new(Self::KIND, self.bound())
    }
}

/// Durable byte store addressed by [`CacheKey`].
///
/// Implementations must be usable through `&self`; the read-through cache
/// never needs exclusive access.
///
/// # Single Writer
///
/// No backend coordinates concurrent writers across processes. Two processes
/// populating the same key race, and the last write wins.
pub trait CacheBackend: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Raw bytes stored under `key`, or `None` if there is no entry.
    fn read(&self, key: &CacheKey) -> ErdosResult<Option<Vec<u8>>>;

    /// Store `bytes` under `key`, replacing any previous entry.
    fn write(&self, key: &CacheKey, bytes: &[u8]) -> ErdosResult<()>;

    /// Every key currently stored, in ascending stem order.
    fn keys(&self) -> ErdosResult<Vec<CacheKey>>;
}

impl<B: CacheBackend + ?Sized> CacheBackend for Box<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn read(&self, key: &CacheKey) -> ErdosResult<Option<Vec<u8>>> {
        (**self).read(key)
    }

    fn write(&self, key: &CacheKey, bytes: &[u8]) -> ErdosResult<()> {
        (**self).write(key, bytes)
    }

    fn keys(&self) -> ErdosResult<Vec<CacheKey>> {
        (**self).keys()
    }
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the backend.
    pub hits: u64,
    /// Lookups with no usable entry, corrupted ones included.
    pub misses: u64,
    /// Entries that existed but could not be read or decoded.
    pub corrupted: u64,
    /// Sets computed because of a miss.
    pub generations: u64,
    /// Successful writes.
    pub stores: u64,
    /// Writes that failed and were skipped.
    pub store_failures: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// ============================================================================
// IMPLEMENTATIONS FOR ERDOS SETS
// ============================================================================

impl CachedSet for PrimeSet {
    const KIND: SetKind = SetKind::Primes;

    fn bound(&self) -> Bound {
        PrimeSet::bound(self)
    }

    fn to_entry(&self) -> CacheEntry {
        CacheEntry::new(Self::KIND, PrimeSet::bound(self), self.to_sorted_vec())
    }

    fn from_entry(bound: Bound, entry: CacheEntry) -> Self {
        PrimeSet::from_cached_parts(bound, entry.values)
    }
}

impl CachedSet for SemiprimeSet {
    const KIND: SetKind = SetKind::Semiprimes;

    fn bound(&self) -> Bound {
        SemiprimeSet::bound(self)
    }

    fn to_entry(&self) -> CacheEntry {
        CacheEntry::new(Self::KIND, SemiprimeSet::bound(self), self.to_sorted_vec())
    }

    fn from_entry(bound: Bound, entry: CacheEntry) -> Self {
        SemiprimeSet::from_cached_parts(bound, entry.values)
    }
}
