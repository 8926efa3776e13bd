//! ERDOS Core - Prime and Distinct-Semiprime Sets
//!
//! Pure generation and query logic. The storage crate layers the exact-bound
//! persistent cache on top of this; nothing here touches disk except reading
//! a settings file.
//!
//! - [`generate_primes_up_to`] sieves every prime `<= N`.
//! - [`generate_distinct_semiprimes_up_to`] pairs a covering prime set into
//!   every `p * q <= M` with `p != q`.
//! - [`is_prime`] / [`is_distinct_semiprime`] answer membership in O(1).

mod bound;
mod config;
mod error;
mod membership;
mod semiprime;
mod sets;
mod sieve;

pub use bound::{Bound, IntoBound};
pub use config::{BackendKind, CacheSettings};
pub use error::{BoundError, CacheError, ConfigError, CoverageError, ErdosError, ErdosResult};
pub use membership::{is_distinct_semiprime, is_prime};
pub use semiprime::{generate_distinct_semiprimes_up_to, try_generate_distinct_semiprimes_up_to};
pub use sets::{PrimeSet, SemiprimeSet, SetKind};
pub use sieve::{generate_primes_up_to, largest_prime_at_most, try_generate_primes_up_to};
