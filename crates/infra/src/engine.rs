//! Reconciliation engine: the single owner of the live inventory.
//!
//! Every mutation goes through the same pipeline:
//!
//! ```text
//! raw input
//!   ↓
//! 1. Normalize (decoder filter / manual validation)
//!   ↓
//! 2. Decide: `Inventory::handle` (pure, produces events)
//!   ↓
//! 3. Apply events to a candidate copy
//!   ↓
//! 4. Persist the candidate (full overwrite)
//!   ↓
//! 5. Commit the candidate as live state
//!   ↓
//! 6. Publish a snapshot to subscribers
//! ```
//!
//! A failed save stops at step 4, so the live state and the store never
//! disagree. Publication failures are logged only; snapshots are derived state.
//!
//! Mutators take `&mut self`. Hosts serialize input onto one consumer (the
//! station's event loop); a multi-threaded host must wrap the whole engine in a
//! single mutex.

use std::path::Path;

use thiserror::Error;

use stocktake_core::{Aggregate, CodeSource, DomainError, ItemCode};
use stocktake_events::{Event, EventBus};
use stocktake_inventory::{
    ExportError, ExportRow, Inventory, InventoryCommand, InventoryEvent, InventorySnapshot, OutcomeEvent,
    RecordCode, ReplaceCollection, ReplaceOrigin, normalize_baseline,
};

use crate::baseline::{BaselineError, BaselineSource};
use crate::export::{ExportWriteError, write_file};
use crate::persister::SnapshotPersister;
use crate::store::{DurableStore, StoreError};

#[derive(Debug, Error)]
pub enum EngineError {
    /// Input rejected before reaching the inventory (e.g. empty manual code).
    #[error("invalid code: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Baseline(#[from] BaselineError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    ExportWrite(#[from] ExportWriteError),

    #[error("inventory invariant violated: {0}")]
    Invariant(String),
}

impl From<DomainError> for EngineError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => EngineError::InvalidInput(msg),
            DomainError::InvariantViolation(msg) => EngineError::Invariant(msg),
        }
    }
}

/// Result of an attempted baseline import that is not allowed to fail the caller.
#[derive(Debug)]
pub enum BaselineStatus {
    Loaded { items: usize },
    Unavailable(EngineError),
    NotConfigured,
}

/// What [`ReconciliationEngine::start`] ended up doing.
#[derive(Debug)]
pub enum StartupReport {
    /// Persisted state was found and restored; the baseline was not consulted.
    Restored { items: usize },
    BaselineLoaded { items: usize },
    BaselineUnavailable(EngineError),
    /// Nothing persisted and no baseline configured.
    Empty,
}

#[derive(Debug)]
pub struct ResetReport {
    pub baseline: BaselineStatus,
}

#[derive(Debug)]
pub struct ReconciliationEngine<S, B> {
    inventory: Inventory,
    persister: SnapshotPersister<S>,
    bus: B,
}

impl<S, B> ReconciliationEngine<S, B> {
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<S, B> ReconciliationEngine<S, B>
where
    S: DurableStore,
    B: EventBus<InventorySnapshot>,
{
    /// Engine over an empty inventory; call [`start`](Self::start) to restore state.
    pub fn new(store: S, bus: B) -> Self {
        Self::with_persister(SnapshotPersister::new(store), bus)
    }

    pub fn with_persister(persister: SnapshotPersister<S>, bus: B) -> Self {
        Self {
            inventory: Inventory::empty(),
            persister,
            bus,
        }
    }

    /// Restore persisted state, falling back to a baseline import when nothing
    /// was persisted. Never fails; problems are reported in the returned value.
    pub async fn start(&mut self, baseline: Option<&dyn BaselineSource>) -> StartupReport {
        let items = self.persister.load().await;

        if !items.is_empty() {
            let command = InventoryCommand::ReplaceCollection(ReplaceCollection {
                items,
                origin: ReplaceOrigin::Restore,
            });
            // Restored state is already what the store holds; nothing to save.
            if let Err(err) = self.inventory.execute(&command) {
                tracing::warn!(error = %err, "failed to restore persisted inventory");
            } else {
                let items = self.inventory.len();
                tracing::info!(items, revision = self.inventory.version(), "persisted inventory restored");
                self.publish_snapshot();
                return StartupReport::Restored { items };
            }
        }

        let report = match baseline {
            None => StartupReport::Empty,
            Some(source) => match self.load_baseline(source).await {
                Ok(items) => StartupReport::BaselineLoaded { items },
                Err(err) => StartupReport::BaselineUnavailable(err),
            },
        };

        if !matches!(report, StartupReport::BaselineLoaded { .. }) {
            self.publish_snapshot();
        }
        report
    }

    /// Reconcile one raw code.
    ///
    /// `Ok(None)` means a decoder read failed the acceptance filter and was
    /// discarded without any state change.
    pub async fn process_code(&mut self, raw: &str, source: CodeSource) -> Result<Option<OutcomeEvent>, EngineError> {
        let code = match ItemCode::from_source(raw, source)? {
            Some(code) => code,
            None => {
                tracing::debug!(raw, %source, "decoder read discarded");
                return Ok(None);
            }
        };

        let events = self
            .commit(&InventoryCommand::RecordCode(RecordCode { code, source }))
            .await?;

        let outcome = events
            .iter()
            .find_map(OutcomeEvent::from_event)
            .ok_or_else(|| EngineError::Invariant("recording a code produced no outcome".to_string()))?;

        tracing::info!(
            code = %outcome.code,
            position = outcome.position,
            source = %outcome.source,
            added = outcome.is_new(),
            revision = self.inventory.version(),
            "code recorded"
        );
        Ok(Some(outcome))
    }

    /// Replace the whole collection with a freshly imported baseline.
    ///
    /// On any failure the current inventory is left untouched.
    pub async fn load_baseline(&mut self, source: &dyn BaselineSource) -> Result<usize, EngineError> {
        let records = source.fetch().await.map_err(|err| {
            tracing::warn!(source = %source.describe(), error = %err, "baseline unavailable");
            err
        })?;

        let command = InventoryCommand::ReplaceCollection(ReplaceCollection {
            items: normalize_baseline(records),
            origin: ReplaceOrigin::Baseline,
        });
        self.commit(&command).await?;

        let items = self.inventory.len();
        tracing::info!(source = %source.describe(), items, revision = self.inventory.version(), "baseline loaded");
        Ok(items)
    }

    /// Clear persisted and in-memory state, then re-attempt the baseline import.
    ///
    /// Fails only when the persisted state cannot be cleared, in which case
    /// memory is untouched too. A failed import leaves an empty inventory and is
    /// reported in [`ResetReport::baseline`].
    pub async fn reset(&mut self, baseline: Option<&dyn BaselineSource>) -> Result<ResetReport, EngineError> {
        self.persister.clear().await?;
        self.inventory
            .execute(&InventoryCommand::ReplaceCollection(ReplaceCollection::reset()))?;
        tracing::info!(revision = self.inventory.version(), "inventory reset");
        self.publish_snapshot();

        let baseline = match baseline {
            None => BaselineStatus::NotConfigured,
            Some(source) => match self.load_baseline(source).await {
                Ok(items) => BaselineStatus::Loaded { items },
                Err(err) => BaselineStatus::Unavailable(err),
            },
        };

        Ok(ResetReport { baseline })
    }

    pub fn snapshot(&self) -> InventorySnapshot {
        self.inventory.snapshot()
    }

    pub fn export(&self) -> Result<Vec<ExportRow>, ExportError> {
        self.inventory.export_rows()
    }

    /// Export to `path` as xlsx or CSV (by extension); returns the number of
    /// rows written.
    pub fn export_file(&self, path: &Path) -> Result<usize, EngineError> {
        let rows = self.export()?;
        let format = write_file(&rows, path)?;
        tracing::info!(path = %path.display(), rows = rows.len(), ?format, "inventory exported");
        Ok(rows.len())
    }

    async fn commit(&mut self, command: &InventoryCommand) -> Result<Vec<InventoryEvent>, EngineError> {
        let events = self.inventory.handle(command)?;

        let mut candidate = self.inventory.clone();
        candidate.apply_all(&events);

        if let Err(err) = self.persister.save(&candidate).await {
            tracing::warn!(error = %err, "failed to persist inventory, change discarded");
            return Err(err.into());
        }

        self.inventory = candidate;
        for event in &events {
            tracing::debug!(event = event.event_type(), revision = self.inventory.version(), "event committed");
        }
        self.publish_snapshot();
        Ok(events)
    }

    fn publish_snapshot(&self) {
        if let Err(err) = self.bus.publish(self.inventory.snapshot()) {
            tracing::warn!(error = ?err, "failed to publish inventory snapshot");
        }
    }
}
