use std::collections::HashMap;

use stocktake_core::ItemCode;

use crate::item::InventoryItem;

/// Code → position lookup over an inventory collection.
///
/// The index is owned by [`Inventory`](crate::Inventory) and is only mutated
/// together with the collection it describes: incrementally when an item is
/// appended, and rebuilt from scratch whenever the collection is replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryIndex {
    positions: HashMap<ItemCode, usize>,
}

impl InventoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index for `items`. Codes in `items` must already be unique.
    pub fn rebuild(items: &[InventoryItem]) -> Self {
        let mut positions = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            let previous = positions.insert(item.code.clone(), position);
            debug_assert!(previous.is_none(), "duplicate code {} in collection", item.code);
        }
        Self { positions }
    }

    pub fn get(&self, code: &ItemCode) -> Option<usize> {
        self.positions.get(code).copied()
    }

    pub fn contains(&self, code: &ItemCode) -> bool {
        self.positions.contains_key(code)
    }

    pub(crate) fn insert(&mut self, code: ItemCode, position: usize) {
        self.positions.insert(code, position);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// True when the index describes exactly `items`.
    pub fn is_consistent_with(&self, items: &[InventoryItem]) -> bool {
        self.positions.len() == items.len()
            && items
                .iter()
                .enumerate()
                .all(|(position, item)| self.get(&item.code) == Some(position))
    }
}
