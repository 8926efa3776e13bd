//! Constant-time membership queries against generated sets.
//!
//! Any integer is a valid query. Zero, negatives and values above the set's
//! bound are simply not members.

use crate::{PrimeSet, SemiprimeSet};

/// Whether `num` is in `primes`.
pub fn is_prime(num: i64, primes: &PrimeSet) -> bool {
    u64::try_from(num).is_ok_and(|n| primes.contains(n))
}

/// Whether `num` is in `semiprimes`.
pub fn is_distinct_semiprime(num: i64, semiprimes: &SemiprimeSet) -> bool {
    u64::try_from(num).is_ok_and(|n| semiprimes.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{generate_distinct_semiprimes_up_to, generate_primes_up_to, Bound};

    fn bound(n: u64) -> Bound {
        Bound::new(n).expect("valid bound")
    }

    #[test]
    fn test_is_prime_function() {
        let primes = generate_primes_up_to(bound(100));
        assert!(is_prime(97, &primes));
        assert!(!is_prime(100, &primes));
        assert!(!is_prime(1, &primes));
    }

    #[test]
    fn test_non_positive_queries_are_false() {
        let primes = generate_primes_up_to(bound(100));
        let semiprimes = generate_distinct_semiprimes_up_to(bound(100), Some(&primes));
        for num in [0, -1, -2, -97, i64::MIN] {
            assert!(!is_prime(num, &primes));
            assert!(!is_distinct_semiprime(num, &semiprimes));
        }
    }

    #[test]
    fn test_is_distinct_semiprime_function() {
        let primes = generate_primes_up_to(bound(210));
        let semiprimes = generate_distinct_semiprimes_up_to(bound(210), Some(&primes));
        assert!(is_distinct_semiprime(6, &semiprimes));
        assert!(is_distinct_semiprime(205, &semiprimes));
        assert!(!is_distinct_semiprime(36, &semiprimes));
        assert!(!is_distinct_semiprime(49, &semiprimes));
        assert!(!is_distinct_semiprime(101, &semiprimes));
    }

    #[test]
    fn test_queries_above_bound_are_false() {
        let primes = generate_primes_up_to(bound(10));
        assert!(!is_prime(11, &primes));
    }
}
