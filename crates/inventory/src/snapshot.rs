//! Snapshots: the serializable view of an inventory, for storage and export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use stocktake_core::{Aggregate, ItemCode};

use crate::baseline::cell_text;
use crate::inventory::Inventory;
use crate::item::{InventoryItem, ItemStatus};

/// Persisted/exported record layout.
///
/// Field names are the on-disk contract shared with previously saved state:
/// `codigo` holds the code (`code` is accepted when reading) and `estado` the
/// status wire value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    #[serde(rename = "codigo", alias = "code", deserialize_with = "code_from_any")]
    pub code: String,
    #[serde(default)]
    pub estado: ItemStatus,
}

/// Codes were sometimes stored as JSON numbers; read any scalar as text.
fn code_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(|value| cell_text(&value))
}

impl SnapshotRecord {
    /// Normalize back into an item; `None` when the stored code is blank.
    pub fn into_item(self) -> Option<InventoryItem> {
        ItemCode::stored(&self.code).map(|code| InventoryItem::new(code, self.estado))
    }
}

impl From<&InventoryItem> for SnapshotRecord {
    fn from(item: &InventoryItem) -> Self {
        Self {
            code: item.code.to_string(),
            estado: item.status,
        }
    }
}

/// Export rows share the persisted layout (`codigo`, then `estado`).
pub type ExportRow = SnapshotRecord;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("nothing to export: the inventory is empty")]
    NothingToExport,
}

/// Pending/found counts.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub pending: usize,
    pub found: usize,
}

/// Read-only, point-in-time copy of the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventorySnapshot {
    pub items: Vec<InventoryItem>,
    /// Inventory version the snapshot was taken at.
    pub revision: u64,
    pub taken_at: DateTime<Utc>,
}

impl InventorySnapshot {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn summary(&self) -> Summary {
        let found = self.items.iter().filter(|i| i.status.is_found()).count();
        Summary {
            total: self.items.len(),
            pending: self.items.len() - found,
            found,
        }
    }

    pub fn records(&self) -> Vec<SnapshotRecord> {
        self.items.iter().map(SnapshotRecord::from).collect()
    }

    /// Rows for the spreadsheet codec; an empty inventory is refused.
    pub fn export_rows(&self) -> Result<Vec<ExportRow>, ExportError> {
        if self.items.is_empty() {
            return Err(ExportError::NothingToExport);
        }
        Ok(self.records())
    }
}

impl Inventory {
    pub fn snapshot(&self) -> InventorySnapshot {
        self.snapshot_at(Utc::now())
    }

    pub fn snapshot_at(&self, taken_at: DateTime<Utc>) -> InventorySnapshot {
        InventorySnapshot {
            items: self.items().to_vec(),
            revision: self.version(),
            taken_at,
        }
    }

    /// Wire records for the durable store.
    pub fn records(&self) -> Vec<SnapshotRecord> {
        self.items().iter().map(SnapshotRecord::from).collect()
    }

    pub fn export_rows(&self) -> Result<Vec<ExportRow>, ExportError> {
        if self.is_empty() {
            return Err(ExportError::NothingToExport);
        }
        Ok(self.records())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(raw: &str) -> ItemCode {
        ItemCode::manual(raw).unwrap()
    }

    fn sample() -> Inventory {
        Inventory::from_items(vec![
            InventoryItem::pending(code("B1000001")),
            InventoryItem::found(code("B1000002")),
            InventoryItem::found(code("X1")),
        ])
    }

    #[test]
    fn records_use_persisted_field_names() {
        let json = serde_json::to_value(sample().records()).unwrap();

        assert_eq!(
            json,
            serde_json::json!([
                {"codigo": "B1000001", "estado": "pendiente"},
                {"codigo": "B1000002", "estado": "encontrado"},
                {"codigo": "X1", "estado": "encontrado"},
            ])
        );
    }

    #[test]
    fn numeric_codes_are_read_as_text() {
        let record: SnapshotRecord =
            serde_json::from_value(serde_json::json!({"codigo": 1000001, "estado": "encontrado"})).unwrap();

        assert_eq!(record.code, "1000001");
        let item = record.into_item().unwrap();
        assert_eq!(item.code.as_str(), "1000001");
        assert!(item.status.is_found());
    }

    #[test]
    fn null_code_yields_no_item() {
        let record: SnapshotRecord = serde_json::from_value(serde_json::json!({"codigo": null})).unwrap();

        assert_eq!(record.into_item(), None);
    }

    #[test]
    fn records_round_trip_through_json() {
        let inventory = sample();
        let json = serde_json::to_string(&inventory.records()).unwrap();

        let records: Vec<SnapshotRecord> = serde_json::from_str(&json).unwrap();
        let restored = Inventory::from_items(records.into_iter().filter_map(SnapshotRecord::into_item));

        assert_eq!(restored.items(), inventory.items());
    }

    #[test]
    fn missing_estado_defaults_to_pending() {
        let record: SnapshotRecord = serde_json::from_str(r#"{"codigo":"b1"}"#).unwrap();
        let item = record.into_item().unwrap();

        assert_eq!(item.code.as_str(), "B1");
        assert_eq!(item.status, ItemStatus::Pending);
    }

    #[test]
    fn code_field_alias_is_accepted() {
        let record: SnapshotRecord = serde_json::from_str(r#"{"code":"B1","estado":"nuevo"}"#).unwrap();
        assert_eq!(record.into_item().unwrap().status, ItemStatus::Found);
    }

    #[test]
    fn blank_codes_do_not_become_items() {
        let record: SnapshotRecord = serde_json::from_str(r#"{"codigo":"  ","estado":"encontrado"}"#).unwrap();
        assert!(record.into_item().is_none());
    }

    #[test]
    fn export_refuses_empty_inventory() {
        assert_eq!(Inventory::empty().export_rows(), Err(ExportError::NothingToExport));
        assert_eq!(
            Inventory::empty().snapshot().export_rows(),
            Err(ExportError::NothingToExport)
        );
    }

    #[test]
    fn export_has_one_row_per_item_in_order() {
        let rows = sample().export_rows().unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].code, "B1000001");
        assert_eq!(rows[2].estado, ItemStatus::Found);
    }

    #[test]
    fn summary_counts_statuses() {
        let summary = sample().snapshot().summary();
        assert_eq!(summary, Summary { total: 3, pending: 1, found: 2 });
    }
}
