//! Station configuration (CLI flags with environment fallbacks).

use std::path::PathBuf;

use clap::Parser;

use stocktake_infra::default_store_path;
use stocktake_observability::LogFormat;

pub const DEFAULT_EXPORT_PATH: &str = "inventario_actualizado.xlsx";

/// Barcode stocktake station: reconcile scanned codes against a baseline inventory
#[derive(Debug, Clone, Parser)]
#[command(name = "stocktake", version)]
pub struct StationConfig {
    /// Baseline dataset: a CSV, JSON or xlsx/ods file path or an http(s) URL
    #[arg(long, env = "STOCKTAKE_BASELINE")]
    pub baseline: Option<String>,

    /// SQLite database holding the session state (default: app data dir)
    #[arg(long, env = "STOCKTAKE_STORE")]
    pub store: Option<PathBuf>,

    /// Keep state in memory only (nothing survives a restart); overrides --store
    #[arg(long)]
    pub memory_store: bool,

    /// Line-oriented decoder output (file or named pipe), one decoded text per line
    #[arg(long, env = "STOCKTAKE_DECODER_FEED")]
    pub decoder_feed: Option<PathBuf>,

    /// Default destination for `:export` (.xlsx writes a workbook, anything else CSV)
    #[arg(long, env = "STOCKTAKE_EXPORT_PATH", default_value = DEFAULT_EXPORT_PATH)]
    pub export_path: PathBuf,

    /// Log output format (json, pretty); logs go to stderr
    #[arg(long, env = "STOCKTAKE_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Which durable store the station should open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChoice {
    Memory,
    Sqlite(PathBuf),
}

impl StationConfig {
    pub fn store_choice(&self) -> anyhow::Result<StoreChoice> {
        if self.memory_store {
            return Ok(StoreChoice::Memory);
        }
        match &self.store {
            Some(path) => Ok(StoreChoice::Sqlite(path.clone())),
            None => Ok(StoreChoice::Sqlite(default_store_path()?)),
        }
    }
}
