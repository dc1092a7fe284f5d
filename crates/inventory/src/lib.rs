//! Inventory reconciliation domain.
//!
//! This crate contains the business rules for reconciling a baseline list of
//! expected item codes against scanned/entered codes, implemented purely as
//! deterministic domain logic (no IO, no async, no storage).

pub mod baseline;
pub mod index;
pub mod inventory;
pub mod item;
pub mod snapshot;

pub use baseline::{BaselineRecord, CODE_COLUMNS, normalize_baseline};
pub use index::InventoryIndex;
pub use inventory::{
    CollectionReplaced, Inventory, InventoryCommand, InventoryEvent, ItemDiscovered,
    ItemMarkedFound, OutcomeEvent, OutcomeKind, RecordCode, ReplaceCollection, ReplaceOrigin,
};
pub use item::{InventoryItem, ItemStatus};
pub use snapshot::{ExportError, ExportRow, InventorySnapshot, SnapshotRecord, Summary};
