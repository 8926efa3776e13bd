//! Generated integer sets and their kinds.

use crate::Bound;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Which derived set a value belongs to. Part of every cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetKind {
    Primes,
    Semiprimes,
}

impl SetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SetKind::Primes => "primes",
            SetKind::Semiprimes => "semiprimes",
        }
    }

    /// Parse the lowercase name produced by [`SetKind::as_str`].
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "primes" => Some(SetKind::Primes),
            "semiprimes" => Some(SetKind::Semiprimes),
            _ => None,
        }
    }

    /// Smallest member any set of this kind can contain.
    pub fn smallest_member(self) -> u64 {
        match self {
            SetKind::Primes => 2,
            SetKind::Semiprimes => 6,
        }
    }
}

impl fmt::Display for SetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every prime `<= bound`, nothing else.
///
/// Built by [`crate::generate_primes_up_to`] or restored from a cache entry
/// that was written from one. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimeSet {
    bound: Bound,
    primes: HashSet<u64>,
}

impl PrimeSet {
    pub(crate) fn from_generated(bound: Bound, primes: HashSet<u64>) -> Self {
        Self { bound, primes }
    }

    /// Rebuild a set from previously generated values.
    ///
    /// The caller vouches that `values` is exactly the primes up to `bound`;
    /// this is how the storage layer restores cached sets without re-sieving.
    pub fn from_cached_parts(bound: Bound, values: impl IntoIterator<Item = u64>) -> Self {
        Self {
            bound,
            primes: values.into_iter().collect(),
        }
    }

    /// The bound this set is complete up to.
    pub fn bound(&self) -> Bound {
        self.bound
    }

    pub fn len(&self) -> usize {
        self.primes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primes.is_empty()
    }

    pub fn contains(&self, value: u64) -> bool {
        self.primes.contains(&value)
    }

    /// Largest prime in the set.
    pub fn max(&self) -> Option<u64> {
        self.primes.iter().copied().max()
    }

    /// Unordered iteration.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.primes.iter().copied()
    }

    pub fn to_sorted_vec(&self) -> Vec<u64> {
        let mut values: Vec<u64> = self.primes.iter().copied().collect();
        values.sort_unstable();
        values
    }

    /// Whether this set holds every prime needed to enumerate distinct
    /// semiprimes up to `m`.
    ///
    /// The largest second factor of a distinct semiprime `<= m` is `m / 2`,
    /// so coverage up to `m / 2` is enough.
    pub fn covers_semiprimes_up_to(&self, m: Bound) -> bool {
        self.bound.get() >= Self::coverage_needed_for(m)
    }

    /// Prime bound required to enumerate distinct semiprimes up to `m`.
    pub fn coverage_needed_for(m: Bound) -> u64 {
        m.get() / 2
    }
}

/// Every product `p * q <= bound` of two distinct primes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemiprimeSet {
    bound: Bound,
    semiprimes: HashSet<u64>,
}

impl SemiprimeSet {
    pub(crate) fn from_generated(bound: Bound, semiprimes: HashSet<u64>) -> Self {
        Self { bound, semiprimes }
    }

    /// Rebuild a set from previously generated values. Same contract as
    /// [`PrimeSet::from_cached_parts`].
    pub fn from_cached_parts(bound: Bound, values: impl IntoIterator<Item = u64>) -> Self {
        Self {
            bound,
            semiprimes: values.into_iter().collect(),
        }
    }

    pub fn bound(&self) -> Bound {
        self.bound
    }

    pub fn len(&self) -> usize {
        self.semiprimes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.semiprimes.is_empty()
    }

    pub fn contains(&self, value: u64) -> bool {
        self.semiprimes.contains(&value)
    }

    pub fn max(&self) -> Option<u64> {
        self.semiprimes.iter().copied().max()
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.semiprimes.iter().copied()
    }

    pub fn to_sorted_vec(&self) -> Vec<u64> {
        let mut values: Vec<u64> = self.semiprimes.iter().copied().collect();
        values.sort_unstable();
        values
    }
}
