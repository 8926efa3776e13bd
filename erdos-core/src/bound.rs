//! Validated upper bounds.

use crate::BoundError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive, non-negative upper bound whose sieve fits in a `Vec` on this
/// platform.
///
/// The only ways to obtain one are [`Bound::new`] and [`IntoBound`], so a
/// negative bound never reaches the generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Bound(u64);

impl Bound {
    /// Largest bound accepted. The sieve allocates `bound + 1` one-byte slots
    /// and a `Vec` never holds more than `isize::MAX` bytes.
    pub const MAX: u64 = isize::MAX as u64 - 1;

    /// Zero bound; generates empty sets.
    pub const ZERO: Bound = Bound(0);

    pub fn new(value: u64) -> Result<Self, BoundError> {
        if value > Self::MAX {
            return Err(BoundError::TooLarge {
                value,
                max: Self::MAX,
            });
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// The bound as a sieve index. Always lossless, see [`Bound::MAX`].
    pub fn as_index(self) -> usize {
        self.0 as usize
    }

    /// Reject bounds above a caller-supplied ceiling.
    pub fn check_ceiling(self, max: u64) -> Result<Self, BoundError> {
        if self.0 > max {
            return Err(BoundError::TooLarge { value: self.0, max });
        }
        Ok(self)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for Bound {
    type Error = BoundError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Bound> for u64 {
    fn from(bound: Bound) -> Self {
        bound.0
    }
}

/// Conversion into a validated [`Bound`].
///
/// Implemented for the primitive integer types so callers can write
/// `cache.get_primes_up_to(1_000_000)` and still get a hard error on negative
/// input.
pub trait IntoBound {
    fn into_bound(self) -> Result<Bound, BoundError>;
}

impl IntoBound for Bound {
    fn into_bound(self) -> Result<Bound, BoundError> {
        Ok(self)
    }
}

macro_rules! impl_into_bound_signed {
    ($($t:ty),*) => {
        $(
            impl IntoBound for $t {
                fn into_bound(self) -> Result<Bound, BoundError> {
                    if self < 0 {
                        return Err(BoundError::Negative { value: self as i64 });
                    }
                    Bound::new(self as u64)
                }
            }
        )*
    };
}

macro_rules! impl_into_bound_unsigned {
    ($($t:ty),*) => {
        $(
            impl IntoBound for $t {
                fn into_bound(self) -> Result<Bound, BoundError> {
                    Bound::new(self as u64)
                }
            }
        )*
    };
}

impl_into_bound_signed!(i32, i64, isize);
impl_into_bound_unsigned!(u32, u64, usize);
