//! Exact-bound cache layer for generated sets.
//!
//! Three layers, bottom up:
//!
//! - [`CacheBackend`] implementations move raw bytes under a [`CacheKey`]
//!   (file per entry, LMDB, or in memory).
//! - [`PersistentCache`] encodes sets as [`CacheEntry`] JSON and turns any
//!   unreadable entry into a miss.
//! - [`SetCache`] answers `get_primes_up_to` / `get_distinct_semiprimes_up_to`
//!   by exact key, generating and storing on a miss.
//!
//! # Example
//!
//! ```ignore
//! let cache = SetCache::new(FileCacheBackend::new("cache")?);
//!
//! // First call sieves and writes cache/primes_up_to_1000000.json
//! let primes = cache.get_primes_up_to(1_000_000)?;
//!
//! // Same bound: read back from disk
//! let again = cache.get_primes_up_to(1_000_000)?;
//!
//! // Different bound: separate entry, full regeneration
//! let other = cache.get_primes_up_to(999_999)?;
//! ```

pub mod entry;
pub mod file_backend;
pub mod key;
pub mod lmdb_backend;
pub mod memory_backend;
pub mod persistent;
pub mod read_through;
pub mod traits;

pub use entry::CacheEntry;
pub use file_backend::FileCacheBackend;
pub use key::CacheKey;
pub use lmdb_backend::{LmdbCacheBackend, LmdbCacheError};
pub use memory_backend::InMemoryCacheBackend;
pub use persistent::PersistentCache;
pub use read_through::SetCache;
pub use traits::{CacheBackend, CacheStats, CachedSet};
