//! Snapshot persistence: the inventory as one JSON document in a durable store.

use serde_json::Value;

use stocktake_inventory::{Inventory, InventoryItem, SnapshotRecord};

use crate::store::{DurableStore, StoreError};

/// Store key holding the persisted inventory.
pub const INVENTORY_KEY: &str = "inventario";

/// Saves and restores the full inventory collection under a single key.
#[derive(Debug, Clone)]
pub struct SnapshotPersister<S> {
    store: S,
    key: String,
}

impl<S: DurableStore> SnapshotPersister<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, INVENTORY_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Overwrite the stored value with the full collection.
    pub async fn save(&self, inventory: &Inventory) -> Result<(), StoreError> {
        let json = serde_json::to_string(&inventory.records()).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.store.save(&self.key, &json).await
    }

    /// Stored items, or an empty collection when nothing usable is stored.
    ///
    /// Never fails: store errors and corrupt documents are logged and read as
    /// empty. Individual malformed records are skipped.
    pub async fn load(&self) -> Vec<InventoryItem> {
        let raw = match self.store.load(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "persisted inventory unavailable, starting empty");
                return Vec::new();
            }
        };

        let values: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "persisted inventory is corrupt, starting empty");
                return Vec::new();
            }
        };

        let total = values.len();
        let items: Vec<InventoryItem> = values
            .into_iter()
            .filter_map(|value| serde_json::from_value::<SnapshotRecord>(value).ok())
            .filter_map(SnapshotRecord::into_item)
            .collect();

        if items.len() < total {
            tracing::warn!(key = %self.key, skipped = total - items.len(), "skipped unusable persisted records");
        }

        items
    }

    /// Remove the stored value entirely.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(&self.key).await
    }
}
