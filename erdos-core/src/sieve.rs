//! Sieve of Eratosthenes.

use crate::{Bound, BoundError, PrimeSet};
use std::collections::HashSet;
use std::collections::TryReserveError;
use std::time::Instant;

/// Generate every prime `<= bound`.
///
/// One boolean slot per integer in `[0, bound]`; each prime `p` strikes out
/// its multiples starting at `p * p`. O(n log log n) time, O(n) space.
/// Bounds below 2 produce an empty set.
///
/// Aborts like any other allocation if the sieve does not fit in memory; use
/// [`try_generate_primes_up_to`] for caller-supplied bounds.
pub fn generate_primes_up_to(bound: Bound) -> PrimeSet {
    let started = Instant::now();
    let primes = sieve(bound.as_index());
    finish(bound, primes, started)
}

/// Like [`generate_primes_up_to`], but a sieve that cannot be allocated is
/// reported as [`BoundError::Unallocatable`].
pub fn try_generate_primes_up_to(bound: Bound) -> Result<PrimeSet, BoundError> {
    let started = Instant::now();
    let primes = try_sieve(bound.as_index()).map_err(|e| {
        tracing::warn!(bound = bound.get(), error = %e, "sieve allocation failed");
        BoundError::Unallocatable {
            value: bound.get(),
            bytes: bound.get() + 1,
        }
    })?;
    Ok(finish(bound, primes, started))
}

fn finish(bound: Bound, primes: Vec<u64>, started: Instant) -> PrimeSet {
    tracing::debug!(
        bound = bound.get(),
        count = primes.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "sieved primes"
    );

    let set: HashSet<u64> = primes.into_iter().collect();
    PrimeSet::from_generated(bound, set)
}

/// Ascending primes `<= n`.
pub(crate) fn sieve(n: usize) -> Vec<u64> {
    if n < 2 {
        return Vec::new();
    }
    strike(vec![true; n + 1])
}

/// Ascending primes `<= n`, failing instead of aborting when the slots
/// cannot be allocated.
pub(crate) fn try_sieve(n: usize) -> Result<Vec<u64>, TryReserveError> {
    if n < 2 {
        return Ok(Vec::new());
    }
    let mut slots = Vec::new();
    slots.try_reserve_exact(n + 1)?;
    slots.resize(n + 1, true);
    Ok(strike(slots))
}

/// The largest prime `<= n`, by trial division downward from `n`.
///
/// Costs one primality test per candidate in the prime gap below `n`, each
/// O(sqrt n). Meant for spot checks, not for building sets.
pub fn largest_prime_at_most(n: u64) -> Option<u64> {
    (2..=n).rev().find(|&candidate| is_prime_by_trial_division(candidate))
}

fn is_prime_by_trial_division(n: u64) -> bool {
    if n < 4 {
        return n >= 2;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut d = 5u64;
    while d <= n / d {
        if n % d == 0 || n % (d + 2) == 0 {
            return false;
        }
        d += 6;
    }
    true
}

/// `is_prime[i]` starts true for every `i`; returns the survivors.
fn strike(mut is_prime: Vec<bool>) -> Vec<u64> {
    let n = is_prime.len() - 1;
    is_prime[0] = false;
    is_prime[1] = false;

    let mut p = 2usize;
    while p <= n / p {
        if is_prime[p] {
            let mut multiple = p * p;
            while multiple <= n {
                is_prime[multiple] = false;
                multiple = match multiple.checked_add(p) {
                    Some(next) => next,
                    None => break,
                };
            }
        }
        p += 1;
    }

    is_prime
        .iter()
        .enumerate()
        .filter_map(|(value, &prime)| prime.then_some(value as u64))
        .collect()
}
