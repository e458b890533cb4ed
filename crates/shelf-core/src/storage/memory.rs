//! In-memory key-value storage

use std::collections::HashMap;

use super::error::StorageResult;
use super::KeyValueStorage;

/// Map-backed storage that counts writes
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
    writes: usize,
    removals: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with one key
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut values = HashMap::new();
        values.insert(key.into(), value.into());
        Self {
            values,
            ..Self::default()
        }
    }

    /// Number of `set` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Number of `remove` calls so far
    pub fn removals(&self) -> usize {
        self.removals
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.writes += 1;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.removals += 1;
        self.values.remove(key);
        Ok(())
    }
}
