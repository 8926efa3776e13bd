//! ERDOS Storage - Exact-Bound Persistent Cache
//!
//! Persists prime and distinct-semiprime sets keyed by (kind, exact bound) so
//! repeated requests for the same bound skip generation. See [`cache`] for
//! the layering.

pub mod cache;

// Re-export cache types for callers
pub use cache::{
    CacheBackend, CacheEntry, CacheKey, CacheStats, CachedSet, FileCacheBackend,
    InMemoryCacheBackend, LmdbCacheBackend, LmdbCacheError, PersistentCache, SetCache,
};

// Re-export the query surface so most callers need only this crate
pub use erdos_core::{
    is_distinct_semiprime, is_prime, BackendKind, Bound, CacheSettings, ErdosError, ErdosResult,
    IntoBound, PrimeSet, SemiprimeSet, SetKind,
};
