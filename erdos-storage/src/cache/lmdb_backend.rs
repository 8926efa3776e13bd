//! LMDB-backed cache implementation.
//!
//! Uses the heed crate (Rust bindings for LMDB) to keep every entry in one
//! memory-mapped environment instead of one file per entry. Keys are the
//! storage stem bytes (`primes_up_to_1000`), so LMDB's sorted keys list
//! entries in stem order for free.
//!
//! # Transactions
//!
//! - Read transactions for `read` and `keys`
//! - One write transaction per `write`, committed before returning

use std::path::Path;

use erdos_core::{CacheError, ErdosError, ErdosResult};
use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use super::key::CacheKey;
use super::traits::CacheBackend;

/// Error type for LMDB cache operations.
#[derive(Debug, thiserror::Error)]
pub enum LmdbCacheError {
    /// Failed to open or create the LMDB environment.
    #[error("Failed to open LMDB environment: {0}")]
    EnvOpen(String),

    /// Failed to open the database within the environment.
    #[error("Failed to open database: {0}")]
    DbOpen(String),

    /// Transaction error.
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convert LmdbCacheError to ErdosError.
impl From<LmdbCacheError> for ErdosError {
    fn from(e: LmdbCacheError) -> Self {
        ErdosError::Cache(CacheError::Backend {
            reason: e.to_string(),
        })
    }
}

/// LMDB-backed cache.
///
/// # Example
///
/// ```ignore
/// use erdos_storage::{LmdbCacheBackend, SetCache};
///
/// let backend = LmdbCacheBackend::new("/var/cache/erdos", 4096)?;
/// let cache = SetCache::new(backend);
/// let primes = cache.get_primes_up_to(10_000_000)?;
/// ```
pub struct LmdbCacheBackend {
    /// The LMDB environment.
    env: Env,
    /// The main database (single unnamed database).
    db: Database<Bytes, Bytes>,
}

impl LmdbCacheBackend {
    /// Create a new LMDB cache backend.
    ///
    /// # Arguments
    ///
    /// * `path` - Directory where LMDB files will be stored
    /// * `max_size_mb` - Maximum size of the database in megabytes
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory cannot be created
    /// - `max_size_mb` does not fit in bytes
    /// - LMDB environment cannot be opened
    /// - Database cannot be created
    pub fn new<P: AsRef<Path>>(path: P, max_size_mb: usize) -> Result<Self, LmdbCacheError> {
        let map_size = max_size_mb.checked_mul(1024 * 1024).ok_or_else(|| {
            LmdbCacheError::EnvOpen(format!("map size of {max_size_mb} MB overflows usize"))
        })?;

        std::fs::create_dir_all(&path)?;

        // SAFETY: the environment is opened once per backend and the directory
        // is not opened a second time from this process.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(1)
                .open(path.as_ref())
        }
        .map_err(|e| LmdbCacheError::EnvOpen(e.to_string()))?;

        let mut wtxn = env
            .write_txn()
            .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;

        let db: Database<Bytes, Bytes> = env
            .create_database(&mut wtxn, None)
            .map_err(|e| LmdbCacheError::DbOpen(e.to_string()))?;

        wtxn.commit()
            .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;

        Ok(Self { env, db })
    }
}

impl CacheBackend for LmdbCacheBackend {
    fn name(&self) -> &'static str {
        "lmdb"
    }

    fn read(&self, key: &CacheKey) -> ErdosResult<Option<Vec<u8>>> {
        let stem = key.stem();
        let rtxn = self
            .env
            .read_txn()
            .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;

        let bytes = self
            .db
            .get(&rtxn, stem.as_bytes())
            .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;

        Ok(bytes.map(<[u8]>::to_vec))
    }

    fn write(&self, key: &CacheKey, bytes: &[u8]) -> ErdosResult<()> {
        let stem = key.stem();
        let mut wtxn = self
            .env
            .write_txn()
            .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;

        self.db
            .put(&mut wtxn, stem.as_bytes(), bytes)
            .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;

        wtxn.commit()
            .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;

        Ok(())
    }

    fn keys(&self) -> ErdosResult<Vec<CacheKey>> {
        let rtxn = self
            .env
            .read_txn()
            .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;

        let iter = self
            .db
            .iter(&rtxn)
            .map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;

        let mut keys = Vec::new();
        for result in iter {
            let (raw, _) = result.map_err(|e| LmdbCacheError::Transaction(e.to_string()))?;
            if let Some(key) = std::str::from_utf8(raw).ok().and_then(CacheKey::parse_stem) {
                keys.push(key);
            }
        }

        Ok(keys)
    }
}
