use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{validate_key, ContentStore, StorageError};

/// In-memory store used by the test suite.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentStore for MemoryStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        validate_key(key)?;
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn exists(&self, key: &str) -> Result<bool, StorageError> {
        validate_key(key)?;
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.contains_key(key))
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        validate_key(prefix)?;
        let dir = format!("{prefix}/");
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries
            .keys()
            .filter(|k| k.starts_with(&dir))
            .cloned()
            .collect())
    }
}
