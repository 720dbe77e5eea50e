use std::collections::HashMap;

use super::{ScoreStore, StoreError};

/// Process-local store, used by tests and when no score file is wanted
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<u32>, StoreError> {
        Ok(self.values.get(key).copied())
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}
