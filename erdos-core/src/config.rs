//! Cache configuration

use crate::{Bound, ConfigError, ErdosResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which durable store holds cache entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// One JSON file per entry, named `<kind>_up_to_<bound>.json`.
    File,
    /// A single LMDB environment keyed by `<kind>_up_to_<bound>`.
    Lmdb,
    /// Process-local map; nothing survives the process.
    Memory,
}

/// Settings for an `erdos_storage::SetCache`.
///
/// Every field is required in TOML. Use [`CacheSettings::default_in`] for the
/// usual values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheSettings {
    /// Directory holding cache files (file backend) or the LMDB environment.
    pub cache_dir: PathBuf,
    pub backend: BackendKind,
    /// Largest bound a caller may request. Sieving allocates one byte per
    /// integer up to the bound.
    pub max_bound: u64,
    /// LMDB map size in megabytes. Ignored by other backends.
    pub lmdb_map_size_mb: usize,
    /// Write freshly generated sets back to the backend.
    pub persist_on_miss: bool,
}

impl CacheSettings {
    /// Ceiling used when none is configured: a 1 GB sieve.
    pub const DEFAULT_MAX_BOUND: u64 = 1_000_000_000;

    /// File backend in `cache_dir` with a 10^9 ceiling.
    pub fn default_in(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            backend: BackendKind::File,
            max_bound: Self::DEFAULT_MAX_BOUND,
            lmdb_map_size_mb: 4_096,
            persist_on_miss: true,
        }
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_max_bound(mut self, max_bound: u64) -> Self {
        self.max_bound = max_bound;
        self
    }

    pub fn with_lmdb_map_size_mb(mut self, size_mb: usize) -> Self {
        self.lmdb_map_size_mb = size_mb;
        self
    }

    pub fn with_persist_on_miss(mut self, persist: bool) -> Self {
        self.persist_on_miss = persist;
        self
    }

    /// Read and validate settings from a TOML file.
    pub fn from_path(path: &Path) -> ErdosResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(contents: &str) -> ErdosResult<Self> {
        let settings: CacheSettings = toml::from_str(contents).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings.
    ///
    /// Validates:
    /// - cache_dir is non-empty for durable backends
    /// - max_bound is positive and sievable on this platform
    /// - lmdb_map_size_mb is positive for the LMDB backend and fits in bytes
    pub fn validate(&self) -> ErdosResult<()> {
        if self.backend != BackendKind::Memory && self.cache_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "cache_dir",
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        if self.max_bound == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_bound",
                reason: "must be > 0".to_string(),
            }
            .into());
        }

        if Bound::new(self.max_bound).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "max_bound",
                reason: format!("must be <= {}", Bound::MAX),
            }
            .into());
        }

        if self.backend == BackendKind::Lmdb && self.lmdb_map_size_mb == 0 {
            return Err(ConfigError::InvalidValue {
                field: "lmdb_map_size_mb",
                reason: "must be > 0".to_string(),
            }
            .into());
        }

        if self.backend == BackendKind::Lmdb && self.lmdb_map_size_bytes().is_none() {
            return Err(ConfigError::InvalidValue {
                field: "lmdb_map_size_mb",
                reason: "overflows the address space".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// LMDB map size in bytes, or `None` if it does not fit in `usize`.
    pub fn lmdb_map_size_bytes(&self) -> Option<usize> {
        self.lmdb_map_size_mb.checked_mul(1024 * 1024)
    }
}
