//! Process-local cache backend.

use std::collections::HashMap;
use std::sync::RwLock;

use erdos_core::{CacheError, ErdosResult};

use super::key::CacheKey;
use super::traits::CacheBackend;

/// In-memory cache; entries vanish with the backend.
#[derive(Debug, Default)]
pub struct InMemoryCacheBackend {
    store: RwLock<HashMap<CacheKey, Vec<u8>>>,
}

impl InMemoryCacheBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.store.read().map(|store| store.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> CacheError {
    CacheError::Backend {
        reason: "in-memory cache lock poisoned".to_string(),
    }
}

impl CacheBackend for InMemoryCacheBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn read(&self, key: &CacheKey) -> ErdosResult<Option<Vec<u8>>> {
        let store = self.store.read().map_err(|_| poisoned())?;
        Ok(store.get(key).cloned())
    }

    fn write(&self, key: &CacheKey, bytes: &[u8]) -> ErdosResult<()> {
        let mut store = self.store.write().map_err(|_| poisoned())?;
        store.insert(*key, bytes.to_vec());
        Ok(())
    }

    fn keys(&self) -> ErdosResult<Vec<CacheKey>> {
        let store = self.store.read().map_err(|_| poisoned())?;
        let mut keys: Vec<CacheKey> = store.keys().copied().collect();
        keys.sort_by_key(|key| key.stem());
        Ok(keys)
    }
}
