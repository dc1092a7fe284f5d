use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use stocktake_core::{Aggregate, CodeSource, DomainError, ItemCode};
use stocktake_events::Event;

use crate::index::InventoryIndex;
use crate::item::{InventoryItem, ItemStatus};

/// Aggregate root: the inventory collection and its code index.
///
/// The collection and the index only change together, inside [`Aggregate::apply`],
/// so every public method observes them consistent with each other.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Inventory {
    items: Vec<InventoryItem>,
    index: InventoryIndex,
    version: u64,
}

impl Inventory {
    /// An empty inventory (nothing loaded yet).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an inventory directly from items, collapsing duplicate codes.
    pub fn from_items(items: impl IntoIterator<Item = InventoryItem>) -> Self {
        let items = dedup_items(items);
        let index = InventoryIndex::rebuild(&items);
        Self {
            items,
            index,
            version: 0,
        }
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn index(&self) -> &InventoryIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position(&self, code: &ItemCode) -> Option<usize> {
        self.index.get(code)
    }

    pub fn get(&self, code: &ItemCode) -> Option<&InventoryItem> {
        self.position(code).and_then(|position| self.items.get(position))
    }

    pub fn status_of(&self, code: &ItemCode) -> Option<ItemStatus> {
        self.get(code).map(|item| item.status)
    }

    /// Decide and apply a command in one step (no persistence in between).
    pub fn execute(&mut self, command: &InventoryCommand) -> Result<Vec<InventoryEvent>, DomainError> {
        let events = self.handle(command)?;
        self.apply_all(&events);
        Ok(events)
    }
}

/// Command: a normalized code was scanned or typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCode {
    pub code: ItemCode,
    pub source: CodeSource,
}

/// Why a collection is being replaced wholesale.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplaceOrigin {
    /// Baseline import from a tabular dataset.
    Baseline,
    /// Persisted state restored at startup.
    Restore,
    /// Explicit full reset (always an empty collection).
    Reset,
}

/// Command: swap the whole collection (and rebuild the index).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceCollection {
    pub items: Vec<InventoryItem>,
    pub origin: ReplaceOrigin,
}

impl ReplaceCollection {
    pub fn reset() -> Self {
        Self {
            items: Vec::new(),
            origin: ReplaceOrigin::Reset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryCommand {
    RecordCode(RecordCode),
    ReplaceCollection(ReplaceCollection),
}

/// Event: an existing item was (re)confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemMarkedFound {
    pub code: ItemCode,
    pub position: usize,
    pub previous: ItemStatus,
    pub source: CodeSource,
}

/// Event: a code not in the collection was scanned and appended as found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDiscovered {
    pub code: ItemCode,
    pub position: usize,
    pub source: CodeSource,
}

/// Event: the collection was replaced; `items` are already de-duplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionReplaced {
    pub items: Vec<InventoryItem>,
    pub origin: ReplaceOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryEvent {
    ItemMarkedFound(ItemMarkedFound),
    ItemDiscovered(ItemDiscovered),
    CollectionReplaced(CollectionReplaced),
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::ItemMarkedFound(_) => "inventory.item.marked_found",
            InventoryEvent::ItemDiscovered(_) => "inventory.item.discovered",
            InventoryEvent::CollectionReplaced(_) => "inventory.collection.replaced",
        }
    }
}

/// What a processed code did, for the presentation layer to render distinctly.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum OutcomeKind {
    /// The code was already in the collection.
    Matched { previous: ItemStatus },
    /// The code was appended as a new found item.
    Added,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeEvent {
    pub code: ItemCode,
    pub position: usize,
    pub source: CodeSource,
    #[serde(flatten)]
    pub kind: OutcomeKind,
}

impl OutcomeEvent {
    /// Derive the outcome of a `RecordCode` command from the event it produced.
    pub fn from_event(event: &InventoryEvent) -> Option<Self> {
        match event {
            InventoryEvent::ItemMarkedFound(e) => Some(Self {
                code: e.code.clone(),
                position: e.position,
                source: e.source,
                kind: OutcomeKind::Matched { previous: e.previous },
            }),
            InventoryEvent::ItemDiscovered(e) => Some(Self {
                code: e.code.clone(),
                position: e.position,
                source: e.source,
                kind: OutcomeKind::Added,
            }),
            InventoryEvent::CollectionReplaced(_) => None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.kind == OutcomeKind::Added
    }

    /// True when the scan changed nothing (the item was already found).
    pub fn is_repeat(&self) -> bool {
        self.kind == OutcomeKind::Matched { previous: ItemStatus::Found }
    }
}

impl Aggregate for Inventory {
    type Command = InventoryCommand;
    type Event = InventoryEvent;
    type Error = DomainError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InventoryEvent::ItemMarkedFound(e) => {
                if let Some(item) = self.items.get_mut(e.position) {
                    item.status = ItemStatus::Found;
                }
            }
            InventoryEvent::ItemDiscovered(e) => {
                debug_assert_eq!(e.position, self.items.len());
                self.items.push(InventoryItem::found(e.code.clone()));
                self.index.insert(e.code.clone(), self.items.len() - 1);
            }
            InventoryEvent::CollectionReplaced(e) => {
                let index = InventoryIndex::rebuild(&e.items);
                self.items = e.items.clone();
                self.index = index;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InventoryCommand::RecordCode(cmd) => self.handle_record(cmd),
            InventoryCommand::ReplaceCollection(cmd) => self.handle_replace(cmd),
        }
    }
}

impl Inventory {
    fn handle_record(&self, cmd: &RecordCode) -> Result<Vec<InventoryEvent>, DomainError> {
        let Some(position) = self.index.get(&cmd.code) else {
            return Ok(vec![InventoryEvent::ItemDiscovered(ItemDiscovered {
                code: cmd.code.clone(),
                position: self.items.len(),
                source: cmd.source,
            })]);
        };

        let item = self
            .items
            .get(position)
            .filter(|item| item.code == cmd.code)
            .ok_or_else(|| DomainError::invariant(format!("index out of sync for code {}", cmd.code)))?;

        Ok(vec![InventoryEvent::ItemMarkedFound(ItemMarkedFound {
            code: cmd.code.clone(),
            position,
            previous: item.status,
            source: cmd.source,
        })])
    }

    fn handle_replace(&self, cmd: &ReplaceCollection) -> Result<Vec<InventoryEvent>, DomainError> {
        if cmd.origin == ReplaceOrigin::Reset && !cmd.items.is_empty() {
            return Err(DomainError::invariant("reset must start from an empty collection"));
        }

        Ok(vec![InventoryEvent::CollectionReplaced(CollectionReplaced {
            items: dedup_items(cmd.items.iter().cloned()),
            origin: cmd.origin,
        })])
    }
}

/// Collapse duplicate codes: first position is kept, statuses merge (found wins).
fn dedup_items(items: impl IntoIterator<Item = InventoryItem>) -> Vec<InventoryItem> {
    let mut seen: HashMap<ItemCode, usize> = HashMap::new();
    let mut out: Vec<InventoryItem> = Vec::new();

    for item in items {
        match seen.get(&item.code) {
            Some(&position) => {
                let existing = &mut out[position];
                existing.status = existing.status.merge(item.status);
            }
            None => {
                seen.insert(item.code.clone(), out.len());
                out.push(item);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(raw: &str) -> ItemCode {
        ItemCode::manual(raw).unwrap()
    }

    fn baseline(codes: &[&str]) -> Inventory {
        let mut inventory = Inventory::empty();
        inventory
            .execute(&InventoryCommand::ReplaceCollection(ReplaceCollection {
                items: codes.iter().map(|c| InventoryItem::pending(code(c))).collect(),
                origin: ReplaceOrigin::Baseline,
            }))
            .unwrap();
        inventory
    }

    fn record(inventory: &mut Inventory, raw: &str, source: CodeSource) -> OutcomeEvent {
        let code = ItemCode::from_source(raw, source).unwrap().unwrap();
        let events = inventory
            .execute(&InventoryCommand::RecordCode(RecordCode { code, source }))
            .unwrap();
        assert_eq!(events.len(), 1);
        OutcomeEvent::from_event(&events[0]).unwrap()
    }

    #[test]
    fn scanning_baseline_item_marks_it_found() {
        let mut inventory = baseline(&["B1000001", "B1000002"]);

        let outcome = record(&mut inventory, "b1000001", CodeSource::Decoder);

        assert_eq!(outcome.kind, OutcomeKind::Matched { previous: ItemStatus::Pending });
        assert_eq!(outcome.position, 0);
        assert_eq!(inventory.status_of(&code("B1000001")), Some(ItemStatus::Found));
        assert_eq!(inventory.status_of(&code("B1000002")), Some(ItemStatus::Pending));
        assert_eq!(inventory.len(), 2);
    }

    #[test]
    fn scanning_unknown_code_appends_found_item() {
        let mut inventory = baseline(&["B1000001", "B1000002"]);

        let outcome = record(&mut inventory, "B9999999", CodeSource::Decoder);

        assert!(outcome.is_new());
        assert_eq!(outcome.position, 2);
        assert_eq!(inventory.len(), 3);
        assert_eq!(inventory.position(&code("B9999999")), Some(2));
        assert_eq!(inventory.status_of(&code("B9999999")), Some(ItemStatus::Found));
        assert!(inventory.index().is_consistent_with(inventory.items()));
    }

    #[test]
    fn rescanning_is_idempotent_but_still_reports() {
        let mut inventory = baseline(&["B1000001"]);

        record(&mut inventory, "B1000001", CodeSource::Manual);
        let second = record(&mut inventory, "B1000001", CodeSource::Manual);

        assert!(second.is_repeat());
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory.status_of(&code("B1000001")), Some(ItemStatus::Found));
    }

    #[test]
    fn discovered_item_is_not_duplicated_on_rescan() {
        let mut inventory = Inventory::empty();

        let first = record(&mut inventory, "x1", CodeSource::Manual);
        let second = record(&mut inventory, " X1 ", CodeSource::Manual);

        assert!(first.is_new());
        assert!(second.is_repeat());
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn replace_collapses_duplicate_codes() {
        let inventory = baseline(&["B1", "b1 ", "B2", "B1"]);

        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory.position(&code("B1")), Some(0));
        assert_eq!(inventory.position(&code("B2")), Some(1));
    }

    #[test]
    fn replace_keeps_found_status_of_duplicates() {
        let inventory = Inventory::from_items(vec![
            InventoryItem::pending(code("B1")),
            InventoryItem::found(code("B1")),
        ]);

        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory.status_of(&code("B1")), Some(ItemStatus::Found));
    }

    #[test]
    fn reset_clears_collection_and_index() {
        let mut inventory = baseline(&["B1000001", "B1000002"]);
        record(&mut inventory, "B9999999", CodeSource::Decoder);

        inventory
            .execute(&InventoryCommand::ReplaceCollection(ReplaceCollection::reset()))
            .unwrap();

        assert!(inventory.is_empty());
        assert!(inventory.index().is_empty());
        assert_eq!(inventory.position(&code("B1000001")), None);
    }

    #[test]
    fn reset_with_items_is_rejected() {
        let inventory = Inventory::empty();
        let err = inventory
            .handle(&InventoryCommand::ReplaceCollection(ReplaceCollection {
                items: vec![InventoryItem::pending(code("B1"))],
                origin: ReplaceOrigin::Reset,
            }))
            .unwrap_err();

        match err {
            DomainError::InvariantViolation(_) => {}
            _ => panic!("Expected InvariantViolation for non-empty reset"),
        }
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let inventory = baseline(&["B1000001"]);
        let before = inventory.clone();

        let cmd = InventoryCommand::RecordCode(RecordCode {
            code: code("B1000001"),
            source: CodeSource::Decoder,
        });
        let events1 = inventory.handle(&cmd).unwrap();
        let events2 = inventory.handle(&cmd).unwrap();

        assert_eq!(inventory, before);
        assert_eq!(events1, events2);
    }

    #[test]
    fn version_tracks_applied_events() {
        let mut inventory = baseline(&["B1000001"]);
        assert_eq!(inventory.version(), 1);

        record(&mut inventory, "B1000001", CodeSource::Decoder);
        record(&mut inventory, "B2000002", CodeSource::Decoder);

        assert_eq!(inventory.version(), 3);
    }

    #[test]
    fn outcome_serializes_with_flat_kind() {
        let outcome = OutcomeEvent {
            code: code("B1000001"),
            position: 0,
            source: CodeSource::Decoder,
            kind: OutcomeKind::Added,
        };
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["code"], "B1000001");
        assert_eq!(json["source"], "decoder");
        assert_eq!(json["kind"], "added");
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn op() -> impl Strategy<Value = (String, bool)> {
            ("[a-cA-C ]?[bB][0-9]{0,2}[ -]?[0-9]{0,5}", any::<bool>())
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: after any sequence of scans, codes stay unique and the
            /// index describes the collection exactly.
            #[test]
            fn index_stays_consistent(
                base in proptest::collection::vec("[A-Z0-9]{1,8}", 0..12),
                ops in proptest::collection::vec(op(), 0..40),
            ) {
                let mut inventory = Inventory::empty();
                inventory.execute(&InventoryCommand::ReplaceCollection(ReplaceCollection {
                    items: base.iter().map(|c| InventoryItem::pending(ItemCode::manual(c).unwrap())).collect(),
                    origin: ReplaceOrigin::Baseline,
                })).unwrap();

                for (raw, from_decoder) in ops {
                    let source = if from_decoder { CodeSource::Decoder } else { CodeSource::Manual };
                    let Ok(Some(code)) = ItemCode::from_source(&raw, source) else { continue };
                    inventory.execute(&InventoryCommand::RecordCode(RecordCode { code: code.clone(), source })).unwrap();
                    prop_assert_eq!(inventory.status_of(&code), Some(ItemStatus::Found));
                }

                prop_assert!(inventory.index().is_consistent_with(inventory.items()));
                let mut codes: Vec<_> = inventory.items().iter().map(|i| i.code.clone()).collect();
                codes.sort();
                codes.dedup();
                prop_assert_eq!(codes.len(), inventory.len());
            }

            /// Property: recording the same code twice leaves exactly one found item.
            #[test]
            fn double_record_is_idempotent(raw in "[A-Z0-9]{1,10}") {
                let mut inventory = Inventory::empty();
                let code = ItemCode::manual(&raw).unwrap();
                let cmd = InventoryCommand::RecordCode(RecordCode { code: code.clone(), source: CodeSource::Manual });

                inventory.execute(&cmd).unwrap();
                inventory.execute(&cmd).unwrap();

                prop_assert_eq!(inventory.len(), 1);
                prop_assert_eq!(inventory.status_of(&code), Some(ItemStatus::Found));
            }
        }
    }
}
