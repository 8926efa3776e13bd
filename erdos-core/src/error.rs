//! Error types for ERDOS operations

use crate::SetKind;
use thiserror::Error;

/// Errors raised while validating a requested upper bound.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoundError {
    #[error("Bound must be non-negative, got {value}")]
    Negative { value: i64 },

    #[error("Bound {value} exceeds the maximum supported bound {max}")]
    TooLarge { value: u64, max: u64 },

    #[error("Bound {value} needs {bytes} bytes of sieve memory, which could not be allocated")]
    Unallocatable { value: u64, bytes: u64 },
}

/// A prime set handed to semiprime generation does not reach far enough.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoverageError {
    #[error("Prime set covers up to {covered}, semiprimes up to {required} need primes up to {needed}")]
    Insufficient {
        covered: u64,
        required: u64,
        needed: u64,
    },
}

/// Cache layer errors.
///
/// Decode failures never reach callers of the read-through cache; they are
/// downgraded to misses there. They are still a distinct variant so backends
/// and tooling can report them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("I/O error on cache entry {key}: {reason}")]
    Io { key: String, reason: String },

    #[error("Failed to encode cache entry {key}: {reason}")]
    Encode { key: String, reason: String },

    #[error("Failed to decode cache entry {key}: {reason}")]
    Decode { key: String, reason: String },

    #[error("Cache entry {key} holds {found_kind} up to {found_bound}")]
    KeyMismatch {
        key: String,
        found_kind: SetKind,
        found_bound: u64,
    },

    #[error("Cache backend error: {reason}")]
    Backend { reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Failed to parse config TOML: {reason}")]
    Parse { reason: String },

    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Master error type for all ERDOS errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ErdosError {
    #[error("Invalid bound: {0}")]
    Bound(#[from] BoundError),

    #[error("Coverage error: {0}")]
    Coverage(#[from] CoverageError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for ERDOS operations.
pub type ErdosResult<T> = Result<T, ErdosError>;

// =============================================================================
// TESTS
// =============================================================================
