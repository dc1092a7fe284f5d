use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::r#trait::{DurableStore, StoreError};

/// In-memory store for tests/dev and `--memory-store` sessions.
///
/// Nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key, e.g. with state saved by an earlier session.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.write() {
            values.insert(key.into(), value.into());
        }
        store
    }

    /// Synchronous peek, for assertions.
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }
}

#[async_trait]
impl DurableStore for InMemoryStore {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.read().map_err(|_| StoreError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.write().map_err(|_| StoreError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.write().map_err(|_| StoreError::Poisoned)?;
        values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_overwrites_previous_value() {
        let store = InMemoryStore::new();

        store.save("inventario", "[1]").await.unwrap();
        store.save("inventario", "[2]").await.unwrap();

        assert_eq!(store.load("inventario").await.unwrap().as_deref(), Some("[2]"));
    }

    #[tokio::test]
    async fn missing_key_loads_as_none_and_removes_cleanly() {
        let store = InMemoryStore::new();

        assert_eq!(store.load("inventario").await.unwrap(), None);
        store.remove("inventario").await.unwrap();
    }

    #[tokio::test]
    async fn remove_deletes_value() {
        let store = InMemoryStore::with_value("inventario", "[]");

        store.remove("inventario").await.unwrap();

        assert_eq!(store.get("inventario"), None);
    }
}
