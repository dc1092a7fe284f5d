//! `stocktake-station`
//!
//! **Responsibility:** the operator-facing process.
//!
//! The station hosts one [`ReconciliationEngine`](stocktake_infra::ReconciliationEngine)
//! and feeds it from a single event queue: console lines and decoder reads are
//! both turned into [`StationEvent`]s and handled one at a time.

pub mod config;
pub mod console;
pub mod decoder;
pub mod notice;
pub mod render;
pub mod station;

pub use config::{StationConfig, StoreChoice};
pub use console::StationCommand;
pub use decoder::DecodeEvent;
pub use notice::{Notice, NoticeLevel};
pub use station::{Output, Reply, Station, StationEvent};
