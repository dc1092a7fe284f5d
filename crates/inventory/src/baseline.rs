//! Baseline normalization: raw tabular rows → pending inventory items.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use stocktake_core::ItemCode;

use crate::item::InventoryItem;

/// Header names recognised as the code column, in lookup order.
///
/// The lowercase `codigo` variant is also the export header, so an exported
/// file can be fed back in as a baseline.
pub const CODE_COLUMNS: &[&str] = &[
    "Codigo", "codigo", "Código", "Cod", "código", "CODIGO", "Code", "code",
];

/// One raw row of a baseline dataset: header → cell value.
///
/// Cells are JSON values so numeric codes coming from spreadsheets or JSON
/// exports survive until normalization coerces them to text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaselineRecord {
    fields: Map<String, Value>,
}

impl BaselineRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and small fixtures.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Text of the first code column holding a non-blank value.
    pub fn code_text(&self) -> Option<String> {
        CODE_COLUMNS
            .iter()
            .filter_map(|column| self.get(column))
            .map(cell_text)
            .find(|text| !text.trim().is_empty())
    }
}

impl FromIterator<(String, Value)> for BaselineRecord {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Text of a cell: strings as-is, null as empty, anything else via JSON.
pub(crate) fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Convert raw rows into pending items.
///
/// Rows without a usable code are dropped. Duplicate codes are kept here and
/// collapsed when the items replace the inventory collection.
pub fn normalize_baseline(records: impl IntoIterator<Item = BaselineRecord>) -> Vec<InventoryItem> {
    records
        .into_iter()
        .filter_map(|record| record.code_text())
        .filter_map(|text| ItemCode::stored(&text))
        .map(InventoryItem::pending)
        .collect()
}
