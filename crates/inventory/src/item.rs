use serde::{Deserialize, Serialize};

use stocktake_core::ItemCode;

/// Reconciliation status of one item.
///
/// `Found` is terminal: nothing but a full inventory reset moves an item out of it.
///
/// The serialized values (`"pendiente"` / `"encontrado"`) are the persisted wire
/// contract and must not change. Reading is lenient: the legacy `"nuevo"` status
/// (unseen items, from the older three-state model) reads as `Found`, and a
/// missing or unknown value reads as `Pending`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "&'static str")]
pub enum ItemStatus {
    /// Baseline item not yet scanned/confirmed.
    #[default]
    Pending,
    /// Item confirmed present (baseline or newly discovered).
    Found,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pendiente",
            ItemStatus::Found => "encontrado",
        }
    }

    /// Parse a stored status value. Never fails; see the type docs for the mapping.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "encontrado" | "nuevo" | "found" | "new" => ItemStatus::Found,
            _ => ItemStatus::Pending,
        }
    }

    pub fn is_found(&self) -> bool {
        *self == ItemStatus::Found
    }

    /// Combine two statuses recorded for the same code. Found wins.
    pub fn merge(self, other: ItemStatus) -> ItemStatus {
        if self.is_found() || other.is_found() {
            ItemStatus::Found
        } else {
            ItemStatus::Pending
        }
    }
}

impl core::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Option<String>> for ItemStatus {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(ItemStatus::parse).unwrap_or_default()
    }
}

impl From<ItemStatus> for &'static str {
    fn from(value: ItemStatus) -> Self {
        value.as_str()
    }
}

/// One line of the inventory: a unique code and its status.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InventoryItem {
    pub code: ItemCode,
    pub status: ItemStatus,
}

impl InventoryItem {
    pub fn new(code: ItemCode, status: ItemStatus) -> Self {
        Self { code, status }
    }

    /// A baseline item awaiting confirmation.
    pub fn pending(code: ItemCode) -> Self {
        Self::new(code, ItemStatus::Pending)
    }

    /// An item confirmed present.
    pub fn found(code: ItemCode) -> Self {
        Self::new(code, ItemStatus::Found)
    }
}
