//! Process-lifetime session storage.
//!
//! The process plays the role of the browser tab: values live exactly as
//! long as the orchestrator does.

use std::sync::Arc;

use dashmap::DashMap;

use chatdock_core::session::SessionStorage;
use chatdock_types::error::StorageError;

/// Concurrent in-memory key-value storage.
///
/// Cloning produces a shared view of the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStorage {
    inner: Arc<DashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.get(key).map(|r| r.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key);
        Ok(())
    }
}
