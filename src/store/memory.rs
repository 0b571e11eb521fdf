//! In-process store.
//!
//! Mostly useful for tests: failures can be injected for the next read or
//! write, and the number of writes is counted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::KeyValueStore;
use crate::error::StoreError;

#[derive(Debug, Default)]
struct MemoryStoreInner {
    entries: HashMap<String, String>,
    fail_next_get: Option<String>,
    fail_next_set: Option<String>,
    writes: usize,
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without counting it as a write.
    pub fn insert(&self, key: &str, value: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.entries.insert(key.to_string(), value.to_string());
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.inner.lock().unwrap().entries.get(key).cloned()
    }

    pub fn writes(&self) -> usize {
        self.inner.lock().unwrap().writes
    }

    pub fn fail_next_get(&self, error: &str) {
        self.inner.lock().unwrap().fail_next_get = Some(error.to_string());
    }

    pub fn fail_next_set(&self, error: &str) {
        self.inner.lock().unwrap().fail_next_set = Some(error.to_string());
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.fail_next_get.take() {
            return Err(StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, error)));
        }
        Ok(inner.entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.fail_next_set.take() {
            return Err(StoreError::Persistence(error));
        }
        inner.entries.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }
}
