//! ERDOS Test Utilities
//!
//! Centralized test infrastructure for the ERDOS workspace:
//! - Trial-division oracles to check generated sets against
//! - Proptest generators for bounds and value sets
//! - Fixtures with documented prime and semiprime values
//! - Temporary caches for every backend
//! - Custom assertions for set validity

// Re-export core types for convenience
pub use erdos_core::{
    generate_distinct_semiprimes_up_to, generate_primes_up_to, is_distinct_semiprime, is_prime,
    Bound, ErdosError, ErdosResult, PrimeSet, SemiprimeSet, SetKind,
};
pub use erdos_storage::{
    CacheKey, CacheStats, FileCacheBackend, InMemoryCacheBackend, LmdbCacheBackend, SetCache,
};

use proptest::prelude::*;
use tempfile::TempDir;

// ============================================================================
// TRACING
// ============================================================================

/// Install a fmt subscriber honouring `RUST_LOG`, once per test binary.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// ORACLES
// ============================================================================

/// Trial-division primality.
pub fn naive_is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2u64;
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

/// Whether `n` factors as `p * q` with `p < q` both prime.
pub fn naive_is_distinct_semiprime(n: u64) -> bool {
    let mut p = 2u64;
    while p <= n / p {
        if n % p == 0 {
            let q = n / p;
            return q != p && naive_is_prime(p) && naive_is_prime(q);
        }
        p += 1;
    }
    false
}

/// Build a bound, panicking on invalid input. Tests only.
pub fn bound(n: u64) -> Bound {
    Bound::new(n).expect("valid bound")
}

// ============================================================================
// FIXTURES
// ============================================================================

/// Every prime below 30.
pub const KNOWN_PRIMES_UP_TO_30: [u64; 10] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29];

/// Documented distinct semiprimes up to 210.
pub const EXPECTED_SEMIPRIMES_UP_TO_210: [u64; 60] = [
    6, 10, 14, 15, 21, 22, 26, 33, 34, 35, 38, 39, 46, 51, 55, 57, 58, 62, 65, 69, 74, 77, 82,
    85, 86, 87, 91, 93, 94, 95, 106, 111, 115, 118, 119, 122, 123, 129, 133, 134, 141, 142, 143,
    145, 146, 155, 158, 159, 161, 166, 177, 178, 183, 185, 187, 194, 201, 202, 203, 205,
];

/// Values up to 210 that must never be distinct semiprimes: prime squares,
/// numbers with three or more prime factors, and primes.
pub const NOT_SEMIPRIMES_UP_TO_210: [u64; 10] = [4, 8, 30, 36, 49, 101, 121, 169, 199, 210];

// ============================================================================
// TEMPORARY CACHES
// ============================================================================

/// File-backed cache in a fresh temporary directory. Keep the `TempDir`
/// alive for as long as the cache is used.
pub fn temp_file_cache() -> (SetCache<FileCacheBackend>, TempDir) {
    let temp_dir = TempDir::new().expect("TempDir creation should succeed");
    let backend = FileCacheBackend::new(temp_dir.path()).expect("backend creation should succeed");
    (SetCache::new(backend), temp_dir)
}

/// LMDB-backed cache in a fresh temporary directory.
pub fn temp_lmdb_cache() -> (SetCache<LmdbCacheBackend>, TempDir) {
    let temp_dir = TempDir::new().expect("TempDir creation should succeed");
    let backend =
        LmdbCacheBackend::new(temp_dir.path(), 64).expect("backend creation should succeed");
    (SetCache::new(backend), temp_dir)
}

pub fn memory_cache() -> SetCache<InMemoryCacheBackend> {
    SetCache::new(InMemoryCacheBackend::new())
}

// ============================================================================
// GENERATORS
// ============================================================================

/// Bounds in `[0, max]`.
pub fn bound_strategy(max: u64) -> impl Strategy<Value = Bound> {
    (0..=max).prop_map(bound)
}

pub fn set_kind_strategy() -> impl Strategy<Value = SetKind> {
    prop_oneof![Just(SetKind::Primes), Just(SetKind::Semiprimes)]
}

// ============================================================================
// ASSERTIONS
// ============================================================================

/// Panic unless `primes` is exactly the primes up to its bound.
pub fn assert_valid_prime_set(primes: &PrimeSet) {
    let n = primes.bound().get();
    for value in primes.iter() {
        assert!(value <= n, "{value} exceeds bound {n}");
        assert!(naive_is_prime(value), "{value} is not prime");
    }
    let expected = (0..=n).filter(|&v| naive_is_prime(v)).count();
    assert_eq!(primes.len(), expected, "missing primes up to {n}");
}

/// Panic unless `semiprimes` is exactly the distinct semiprimes up to its bound.
pub fn assert_valid_semiprime_set(semiprimes: &SemiprimeSet) {
    let m = semiprimes.bound().get();
    for value in semiprimes.iter() {
        assert!(value <= m, "{value} exceeds bound {m}");
        assert!(
            naive_is_distinct_semiprime(value),
            "{value} is not a distinct semiprime"
        );
    }
    let expected = (0..=m).filter(|&v| naive_is_distinct_semiprime(v)).count();
    assert_eq!(semiprimes.len(), expected, "missing semiprimes up to {m}");
}
