//! Infrastructure layer: durable storage, baseline sources, export codec and
//! the reconciliation engine that composes them around the inventory domain.

pub mod baseline;
pub mod engine;
pub mod export;
pub mod persister;
pub mod store;


pub use baseline::{
    BaselineError, BaselineSource, FileSource, HttpSource, RecordsSource, TabularFormat, source_from_location,
};
pub use engine::{BaselineStatus, EngineError, ReconciliationEngine, ResetReport, StartupReport};
pub use export::{ExportFormat, ExportWriteError, write_csv, write_csv_file, write_file, write_xlsx_file};
pub use persister::{INVENTORY_KEY, SnapshotPersister};
pub use store::{DurableStore, InMemoryStore, SqliteStore, StoreError, default_store_path};
