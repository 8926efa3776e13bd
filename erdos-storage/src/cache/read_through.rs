//! Read-through access to prime and semiprime sets.
//!
//! Every request is answered from the cache entry for exactly the requested
//! bound, or generated, stored and returned. A cached set for a different
//! bound is never reused, trimmed or extended.

use erdos_core::{
    try_generate_distinct_semiprimes_up_to, try_generate_primes_up_to, BackendKind, Bound,
    CacheSettings, ErdosResult, IntoBound, PrimeSet, SemiprimeSet,
};

use super::file_backend::FileCacheBackend;
use super::key::CacheKey;
use super::lmdb_backend::LmdbCacheBackend;
use super::memory_backend::InMemoryCacheBackend;
use super::persistent::PersistentCache;
use super::traits::{CacheBackend, CacheStats, CachedSet};

/// Cached generator for prime and distinct-semiprime sets.
///
/// # Example
///
/// ```ignore
/// let cache = SetCache::open(&CacheSettings::default_in("/var/cache/erdos"))?;
///
/// let primes = cache.get_primes_up_to(1_000_000)?;
/// let semiprimes = cache.get_distinct_semiprimes_up_to(1_000_000, Some(&primes))?;
///
/// assert!(is_prime(1_049, &primes));
/// assert!(is_distinct_semiprime(2_098, &semiprimes));
/// ```
pub struct SetCache<B: CacheBackend> {
    cache: PersistentCache<B>,
    max_bound: u64,
    persist_on_miss: bool,
}

impl SetCache<Box<dyn CacheBackend>> {
    /// Build the backend named by `settings` and wrap it.
    pub fn open(settings: &CacheSettings) -> ErdosResult<Self> {
        settings.validate()?;

        let backend: Box<dyn CacheBackend> = match settings.backend {
            BackendKind::File => Box::new(FileCacheBackend::new(&settings.cache_dir)?),
            BackendKind::Lmdb => Box::new(LmdbCacheBackend::new(
                &settings.cache_dir,
                settings.lmdb_map_size_mb,
            )?),
            BackendKind::Memory => Box::new(InMemoryCacheBackend::new()),
        };

        tracing::debug!(
            backend = backend.name(),
            cache_dir = %settings.cache_dir.display(),
            max_bound = settings.max_bound,
            "opened set cache"
        );

        Ok(Self::new(backend)
            .with_max_bound(settings.max_bound)
            .with_persist_on_miss(settings.persist_on_miss))
    }
}

impl<B: CacheBackend> SetCache<B> {
    /// Wrap `backend` with the default ceiling
    /// ([`CacheSettings::DEFAULT_MAX_BOUND`]), persisting on miss.
    pub fn new(backend: B) -> Self {
        Self {
            cache: PersistentCache::new(backend),
            max_bound: CacheSettings::DEFAULT_MAX_BOUND,
            persist_on_miss: true,
        }
    }

    /// Reject requests above `max_bound`, clamped to [`Bound::MAX`].
    pub fn with_max_bound(mut self, max_bound: u64) -> Self {
        self.max_bound = max_bound.min(Bound::MAX);
        self
    }

    pub fn with_persist_on_miss(mut self, persist: bool) -> Self {
        self.persist_on_miss = persist;
        self
    }

    pub fn max_bound(&self) -> u64 {
        self.max_bound
    }

    pub fn persistent(&self) -> &PersistentCache<B> {
        &self.cache
    }

    pub fn backend(&self) -> &B {
        self.cache.backend()
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Every cache entry currently stored.
    pub fn keys(&self) -> ErdosResult<Vec<CacheKey>> {
        self.cache.keys()
    }

    /// Every prime `<= bound`, from the cache entry for exactly `bound` or
    /// freshly sieved.
    ///
    /// # Errors
    ///
    /// Only invalid bounds: negative, above [`SetCache::max_bound`], or too
    /// large for the sieve to allocate. Cache read and write problems are
    /// logged, not returned.
    pub fn get_primes_up_to(&self, bound: impl IntoBound) -> ErdosResult<PrimeSet> {
        let bound = self.validate(bound)?;

        if let Some(primes) = self.cache.load::<PrimeSet>(bound) {
            return Ok(primes);
        }

        let primes = try_generate_primes_up_to(bound)?;
        self.cache.record_generation();
        self.persist(&primes);
        Ok(primes)
    }

    /// Every distinct semiprime `<= bound`, from the cache entry for exactly
    /// `bound` or freshly enumerated.
    ///
    /// On a miss the enumeration uses `primes` when it covers `bound`.
    /// Otherwise, or when `primes` is `None`, it uses
    /// [`SetCache::get_primes_up_to`] with the same bound, which itself may be
    /// a cache hit.
    pub fn get_distinct_semiprimes_up_to(
        &self,
        bound: impl IntoBound,
        primes: Option<&PrimeSet>,
    ) -> ErdosResult<SemiprimeSet> {
        let bound = self.validate(bound)?;

        if let Some(semiprimes) = self.cache.load::<SemiprimeSet>(bound) {
            return Ok(semiprimes);
        }

        let semiprimes = match primes {
            Some(primes) if primes.covers_semiprimes_up_to(bound) => {
                try_generate_distinct_semiprimes_up_to(bound, primes)?
            }
            other => {
                if let Some(short) = other {
                    tracing::warn!(
                        bound = bound.get(),
                        covered = short.bound().get(),
                        needed = PrimeSet::coverage_needed_for(bound),
                        "prime set does not cover semiprime bound, loading primes for the same bound"
                    );
                }
                let covering = self.get_primes_up_to(bound)?;
                try_generate_distinct_semiprimes_up_to(bound, &covering)?
            }
        };

        self.cache.record_generation();
        self.persist(&semiprimes);
        Ok(semiprimes)
    }

    fn validate(&self, bound: impl IntoBound) -> ErdosResult<Bound> {
        Ok(bound.into_bound()?.check_ceiling(self.max_bound)?)
    }

    fn persist<T: CachedSet>(&self, set: &T) {
        if !self.persist_on_miss {
            return;
        }
        if let Err(e) = self.cache.store(set) {
            tracing::warn!(
                key = %set.cache_key(),
                backend = self.cache.backend().name(),
                error = %e,
                "failed to store generated set, continuing without cache entry"
            );
        }
    }
}
