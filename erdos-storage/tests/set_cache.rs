//! End-to-end behaviour of the read-through cache over real backends.

use std::fs;

use erdos_storage::{
    is_distinct_semiprime, is_prime, BackendKind, CacheBackend, CacheKey, CacheSettings,
    FileCacheBackend, PersistentCache, PrimeSet, SemiprimeSet, SetCache, SetKind,
};
use erdos_test_utils::{
    assert_valid_prime_set, assert_valid_semiprime_set, bound, bound_strategy, init_test_tracing,
    memory_cache, set_kind_strategy, temp_file_cache, temp_lmdb_cache,
    EXPECTED_SEMIPRIMES_UP_TO_210, KNOWN_PRIMES_UP_TO_30, NOT_SEMIPRIMES_UP_TO_210,
};
use proptest::prelude::*;
use tempfile::TempDir;

#[test]
fn test_known_primes() {
    init_test_tracing();
    let (cache, _temp_dir) = temp_file_cache();

    let primes = cache.get_primes_up_to(30).expect("primes");
    for p in KNOWN_PRIMES_UP_TO_30 {
        assert!(primes.contains(p));
    }
    assert_valid_prime_set(&primes);
}

#[test]
fn test_is_prime_function() {
    let (cache, _temp_dir) = temp_file_cache();
    let primes = cache.get_primes_up_to(100).expect("primes");
    assert!(is_prime(97, &primes));
    assert!(!is_prime(100, &primes));
}

#[test]
fn test_distinct_semiprime_generation() {
    init_test_tracing();
    let (cache, _temp_dir) = temp_file_cache();

    let primes = cache.get_primes_up_to(210).expect("primes");
    let semiprimes = cache
        .get_distinct_semiprimes_up_to(210, Some(&primes))
        .expect("semiprimes");

    for value in EXPECTED_SEMIPRIMES_UP_TO_210 {
        assert!(is_distinct_semiprime(value as i64, &semiprimes), "{value}");
    }
    for value in NOT_SEMIPRIMES_UP_TO_210 {
        assert!(!is_distinct_semiprime(value as i64, &semiprimes), "{value}");
    }
    assert_valid_semiprime_set(&semiprimes);
}

#[test]
fn test_file_layout_uses_exact_bound() {
    let (cache, temp_dir) = temp_file_cache();
    cache.get_distinct_semiprimes_up_to(1_000, None).expect("semiprimes");

    assert!(temp_dir.path().join("primes_up_to_1000.json").is_file());
    assert!(temp_dir.path().join("semiprimes_up_to_1000.json").is_file());
}

#[test]
fn test_entries_survive_reopen() {
    let temp_dir = TempDir::new().expect("TempDir creation should succeed");

    let first = {
        let cache = SetCache::new(FileCacheBackend::new(temp_dir.path()).expect("backend"));
        let primes = cache.get_primes_up_to(10_000).expect("primes");
        assert_eq!(cache.stats().generations, 1);
        primes
    };

    let cache = SetCache::new(FileCacheBackend::new(temp_dir.path()).expect("backend"));
    let second = cache.get_primes_up_to(10_000).expect("primes");

    assert_eq!(first, second);
    let stats = cache.stats();
    assert_eq!(stats.generations, 0);
    assert_eq!(stats.hits, 1);
}

#[test]
fn test_idempotent_calls_compute_once() {
    let (cache, _temp_dir) = temp_file_cache();
    let a = cache.get_primes_up_to(50_000).expect("primes");
    let b = cache.get_primes_up_to(50_000).expect("primes");
    assert_eq!(a, b);
    assert_eq!(cache.stats().generations, 1);

    let (cache, _temp_dir) = temp_lmdb_cache();
    let a = cache.get_distinct_semiprimes_up_to(5_000, None).expect("semiprimes");
    let b = cache.get_distinct_semiprimes_up_to(5_000, None).expect("semiprimes");
    assert_eq!(a, b);
    // primes once, semiprimes once
    assert_eq!(cache.stats().generations, 2);
}

#[test]
fn test_neighbouring_bounds_never_share_entries() {
    let (cache, _temp_dir) = temp_lmdb_cache();
    for n in [999_999u64, 1_000_000, 1_000_001] {
        let primes = cache.get_primes_up_to(n).expect("primes");
        assert_eq!(primes.bound().get(), n);
    }
    assert_eq!(cache.stats().generations, 3);

    let stems: Vec<String> = cache.keys().expect("keys").iter().map(CacheKey::stem).collect();
    assert_eq!(
        stems,
        vec![
            "primes_up_to_1000000",
            "primes_up_to_1000001",
            "primes_up_to_999999",
        ]
    );
}

#[test]
fn test_corrupted_file_is_regenerated_and_overwritten() {
    init_test_tracing();
    let (cache, temp_dir) = temp_file_cache();
    let path = temp_dir.path().join("primes_up_to_100.json");
    fs::write(&path, b"{\"kind\":\"primes\",\"bound\":100,\"values\":[2,3,").expect("write");

    let primes = cache.get_primes_up_to(100).expect("corruption is not fatal");
    assert_eq!(primes.len(), 25);

    let stats = cache.stats();
    assert_eq!(stats.corrupted, 1);
    assert_eq!(stats.generations, 1);
    assert_eq!(stats.stores, 1);

    // The healed entry now loads cleanly
    let reloaded = cache.get_primes_up_to(100).expect("primes");
    assert_eq!(reloaded, primes);
    assert_eq!(cache.stats().hits, 1);
}

#[test]
fn test_out_of_range_entry_is_not_served() {
    let (cache, temp_dir) = temp_file_cache();
    // Well-formed JSON holding a value above its bound
    fs::write(
        temp_dir.path().join("primes_up_to_10.json"),
        br#"{"kind":"primes","bound":10,"values":[2,3,5,7,11]}"#,
    )
    .expect("write");

    let primes = cache.get_primes_up_to(10).expect("primes");
    assert_eq!(primes.to_sorted_vec(), vec![2, 3, 5, 7]);
    assert_eq!(cache.stats().corrupted, 1);
}

#[test]
fn test_prime_list_cut_short_is_regenerated() {
    let (cache, temp_dir) = temp_file_cache();
    fs::write(
        temp_dir.path().join("primes_up_to_100.json"),
        br#"{"kind":"primes","bound":100,"values":[2,3,9]}"#,
    )
    .expect("write");

    let primes = cache.get_primes_up_to(100).expect("primes");
    assert_eq!(primes.len(), 25);
    assert!(!primes.contains(9));
    assert_eq!(cache.stats().corrupted, 1);

    let healed = fs::read_to_string(temp_dir.path().join("primes_up_to_100.json")).expect("read");
    assert!(healed.ends_with("89,97]}"), "{healed}");
}

#[test]
fn test_unwritable_cache_still_returns_sets() {
    init_test_tracing();
    let (cache, temp_dir) = temp_file_cache();
    // A directory squatting on the entry path makes the write fail
    fs::create_dir(temp_dir.path().join("primes_up_to_20.json")).expect("mkdir");

    let primes = cache.get_primes_up_to(20).expect("write failure is not fatal");
    assert_eq!(primes.len(), 8);
    assert_eq!(cache.stats().store_failures, 1);
}

#[test]
fn test_open_file_backend_from_toml() {
    let temp_dir = TempDir::new().expect("TempDir creation should succeed");
    let cache_dir = temp_dir.path().join("sets");
    let toml = format!(
        "cache_dir = {:?}\nbackend = \"file\"\nmax_bound = 100000\nlmdb_map_size_mb = 16\npersist_on_miss = true\n",
        cache_dir.display().to_string()
    );
    let settings = CacheSettings::from_toml_str(&toml).expect("valid settings");
    assert_eq!(settings.backend, BackendKind::File);

    let cache = SetCache::open(&settings).expect("open should succeed");
    cache.get_primes_up_to(1_000).expect("primes");
    assert!(cache_dir.join("primes_up_to_1000.json").is_file());
    assert!(cache.get_primes_up_to(100_001).is_err());
}

#[test]
fn test_open_lmdb_backend() {
    let temp_dir = TempDir::new().expect("TempDir creation should succeed");
    let settings = CacheSettings::default_in(temp_dir.path())
        .with_backend(BackendKind::Lmdb)
        .with_lmdb_map_size_mb(32);

    let cache = SetCache::open(&settings).expect("open should succeed");
    assert_eq!(cache.backend().name(), "lmdb");

    let semiprimes = cache.get_distinct_semiprimes_up_to(210, None).expect("semiprimes");
    assert!(is_distinct_semiprime(205, &semiprimes));
    assert_eq!(cache.keys().expect("keys").len(), 2);
}

#[test]
fn test_large_bound_matches_demo_values() {
    let cache = memory_cache();
    let primes = cache.get_primes_up_to(1_000_000).expect("primes");
    let semiprimes = cache
        .get_distinct_semiprimes_up_to(1_000_000, Some(&primes))
        .expect("semiprimes");

    assert_eq!(primes.max(), Some(999_983));
    assert!(is_prime(1_049, &primes));
    assert!(!is_prime(1_050, &primes));

    assert!(!is_distinct_semiprime(1_049, &semiprimes));
    assert!(is_distinct_semiprime(2_098, &semiprimes));
    assert!(!is_distinct_semiprime(49, &semiprimes));
    assert!(semiprimes.max().is_some_and(|max| max <= 1_000_000));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: storing a set and loading it back under the same key yields
    /// the same set.
    #[test]
    fn prop_store_load_roundtrip(b in bound_strategy(3_000)) {
        let temp_dir = TempDir::new().expect("TempDir creation should succeed");
        let cache = PersistentCache::new(FileCacheBackend::new(temp_dir.path()).expect("backend"));

        let primes = erdos_test_utils::generate_primes_up_to(b);
        let semiprimes = erdos_test_utils::generate_distinct_semiprimes_up_to(b, Some(&primes));
        cache.store(&primes).expect("store primes");
        cache.store(&semiprimes).expect("store semiprimes");

        prop_assert_eq!(cache.load::<PrimeSet>(b), Some(primes));
        prop_assert_eq!(cache.load::<SemiprimeSet>(b), Some(semiprimes));
    }

    /// Property: a generated set is stored under its own stem and listed.
    #[test]
    fn prop_generated_entries_are_listed(
        kind in set_kind_strategy(),
        b in bound_strategy(500),
    ) {
        let (cache, temp_dir) = temp_file_cache();
        match kind {
            SetKind::Primes => {
                cache.get_primes_up_to(b).expect("primes");
            }
            SetKind::Semiprimes => {
                cache.get_distinct_semiprimes_up_to(b, None).expect("semiprimes");
            }
        }

        let key = CacheKey::new(kind, b);
        prop_assert!(cache.keys().expect("keys").contains(&key));
        let file_name = format!("{}.json", key.stem());
        prop_assert!(temp_dir.path().join(file_name).is_file());
        prop_assert_eq!(CacheKey::parse_stem(&key.stem()), Some(key));
    }

    /// Property: cached and uncached answers agree for every bound.
    #[test]
    fn prop_cached_sets_are_exact(n in 0u64..1_500) {
        let cache = memory_cache();
        let primes = cache.get_primes_up_to(n).expect("primes");
        let semiprimes = cache.get_distinct_semiprimes_up_to(n, None).expect("semiprimes");

        prop_assert_eq!(primes.bound(), bound(n));
        assert_valid_prime_set(&primes);
        assert_valid_semiprime_set(&semiprimes);
    }
}
