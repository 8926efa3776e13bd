//! Distinct-semiprime enumeration over a prime set.

use crate::sieve::sieve;
use crate::{Bound, CoverageError, PrimeSet, SemiprimeSet};
use std::collections::HashSet;
use std::time::Instant;

/// Generate every product `p * q <= m` of two distinct primes.
///
/// `primes` must cover `m` (see [`PrimeSet::covers_semiprimes_up_to`]). When it
/// is absent or too short, a covering prime list is sieved here instead, so the
/// result is always complete.
pub fn generate_distinct_semiprimes_up_to(m: Bound, primes: Option<&PrimeSet>) -> SemiprimeSet {
    match primes {
        Some(primes) if primes.covers_semiprimes_up_to(m) => {
            enumerate(m, &primes.to_sorted_vec())
        }
        Some(primes) => {
            tracing::warn!(
                bound = m.get(),
                covered = primes.bound().get(),
                needed = PrimeSet::coverage_needed_for(m),
                "prime set does not cover semiprime bound, sieving a covering set"
            );
            enumerate(m, &covering_primes(m))
        }
        None => enumerate(m, &covering_primes(m)),
    }
}

/// Like [`generate_distinct_semiprimes_up_to`], but an insufficient prime set
/// is an error rather than a reason to re-sieve.
pub fn try_generate_distinct_semiprimes_up_to(
    m: Bound,
    primes: &PrimeSet,
) -> Result<SemiprimeSet, CoverageError> {
    if !primes.covers_semiprimes_up_to(m) {
        return Err(CoverageError::Insufficient {
            covered: primes.bound().get(),
            required: m.get(),
            needed: PrimeSet::coverage_needed_for(m),
        });
    }
    Ok(enumerate(m, &primes.to_sorted_vec()))
}

fn covering_primes(m: Bound) -> Vec<u64> {
    sieve((m.get() / 2) as usize)
}

/// Pair each prime with every larger prime while the product stays `<= m`.
///
/// `sorted` must be ascending. Pairs are taken with `i < j` only, so no
/// product is produced twice and no square ever is.
fn enumerate(m: Bound, sorted: &[u64]) -> SemiprimeSet {
    let started = Instant::now();
    let limit = m.get();
    let mut semiprimes = HashSet::new();

    for (i, &first) in sorted.iter().enumerate() {
        // first * first > limit, without overflowing
        if first > limit / first {
            break;
        }
        let max_second = limit / first;
        for &second in &sorted[i + 1..] {
            if second > max_second {
                break;
            }
            semiprimes.insert(first * second);
        }
    }

    tracing::debug!(
        bound = limit,
        primes = sorted.len(),
        count = semiprimes.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "enumerated distinct semiprimes"
    );

    SemiprimeSet::from_generated(m, semiprimes)
}
