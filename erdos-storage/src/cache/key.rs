//! Exact-bound cache keys.
//!
//! A key is the pair (set kind, bound) and nothing else. Two requests share an
//! entry only when both halves are equal; there is no prefix or superset reuse.

use erdos_core::{Bound, SetKind};
use std::fmt;

/// Separator between the kind and the bound in a storage stem.
const STEM_SEPARATOR: &str = "_up_to_";

/// Identifies one cache entry.
///
/// # Storage Stem
///
/// Every backend names entries by the same stem, `<kind>_up_to_<bound>`:
/// - `primes_up_to_1000000`
/// - `semiprimes_up_to_210`
///
/// The file backend appends `.json`; the LMDB backend uses the stem bytes as
/// the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    kind: SetKind,
    bound: Bound,
}

impl CacheKey {
    pub fn new(kind: SetKind, bound: Bound) -> Self {
        Self { kind, bound }
    }

    pub fn primes(bound: Bound) -> Self {
        Self::new(SetKind::Primes, bound)
    }

    pub fn semiprimes(bound: Bound) -> Self {
        Self::new(SetKind::Semiprimes, bound)
    }

    pub fn kind(&self) -> SetKind {
        self.kind
    }

    pub fn bound(&self) -> Bound {
        self.bound
    }

    /// Deterministic storage name, e.g. `primes_up_to_1000`.
    pub fn stem(&self) -> String {
        self.to_string()
    }

    /// Parse a stem produced by [`CacheKey::stem`].
    ///
    /// Returns `None` if:
    /// - The separator is missing
    /// - The kind is not `primes` or `semiprimes`
    /// - The bound is not a canonical decimal integer in range
    pub fn parse_stem(stem: &str) -> Option<Self> {
        let (kind, bound) = stem.split_once(STEM_SEPARATOR)?;
        let kind = SetKind::parse(kind)?;

        // Reject "+5", "007" and friends so every key has exactly one stem.
        if bound.is_empty()
            || !bound.bytes().all(|b| b.is_ascii_digit())
            || (bound.len() > 1 && bound.starts_with('0'))
        {
            return None;
        }

        let bound = Bound::new(bound.parse().ok()?).ok()?;
        Some(Self::new(kind, bound))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.kind.as_str(), STEM_SEPARATOR, self.bound.get())
    }
}
