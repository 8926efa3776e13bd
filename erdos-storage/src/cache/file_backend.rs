//! One-file-per-entry cache backend.
//!
//! Entries live in a single directory as `<kind>_up_to_<bound>.json`. Each
//! operation opens its file, does its work and drops the handle before
//! returning.
//!
//! Writes are not atomic: a crash mid-write leaves a truncated file, which the
//! next load reports as corrupted and regenerates.

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use erdos_core::{CacheError, ErdosResult};

use super::key::CacheKey;
use super::traits::CacheBackend;

const EXTENSION: &str = "json";

/// Directory-backed cache.
#[derive(Debug, Clone)]
pub struct FileCacheBackend {
    dir: PathBuf,
}

impl FileCacheBackend {
    /// Use `dir` for entries, creating it if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> ErdosResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| CacheError::Io {
            key: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{}.{}", key.stem(), EXTENSION))
    }
}

impl CacheBackend for FileCacheBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    fn read(&self, key: &CacheKey) -> ErdosResult<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::Io {
                key: key.stem(),
                reason: e.to_string(),
            }
            .into()),
        }
    }

    fn write(&self, key: &CacheKey, bytes: &[u8]) -> ErdosResult<()> {
        let io_err = |e: std::io::Error| CacheError::Io {
            key: key.stem(),
            reason: e.to_string(),
        };

        let file = File::create(self.path_for(key)).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(bytes).map_err(io_err)?;
        writer.flush().map_err(io_err)?;
        Ok(())
    }

    fn keys(&self) -> ErdosResult<Vec<CacheKey>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| CacheError::Io {
            key: self.dir.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut keys: Vec<CacheKey> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == EXTENSION))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .and_then(CacheKey::parse_stem)
            })
            .collect();
        keys.sort_by_key(|key| key.stem());
        Ok(keys)
    }
}
