//! Baseline sources: where the expected set of codes comes from.
//!
//! A source only fetches raw rows; normalization into pending items happens in
//! `stocktake_inventory::normalize_baseline`.

pub mod file;
pub mod http;
pub mod tabular;

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use stocktake_inventory::BaselineRecord;

pub use file::FileSource;
pub use http::HttpSource;
pub use tabular::{parse_csv, parse_json, parse_workbook};

/// Why a baseline dataset could not be obtained.
///
/// Always recoverable: the caller keeps its current inventory.
#[derive(Debug, Error)]
pub enum BaselineError {
    #[error("failed to read baseline from {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("baseline request returned HTTP {status}")]
    Http { status: u16 },

    #[error("failed to download baseline: {0}")]
    Fetch(String),

    #[error("failed to parse baseline: {0}")]
    Parse(String),

    #[error("unsupported baseline format: {0}")]
    UnsupportedFormat(String),
}

/// Encoding of a tabular dataset.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TabularFormat {
    Csv,
    Json,
    /// Spreadsheet workbook; only the first sheet is read.
    Workbook,
}

impl TabularFormat {
    /// Pick a format from a path or URL extension.
    ///
    /// `.json` is JSON, Excel and OpenDocument extensions are workbooks, Apple
    /// Numbers files are refused, and anything else is read as CSV.
    pub fn detect(location: &str) -> Result<Self, BaselineError> {
        let path = location.split(['?', '#']).next().unwrap_or(location);
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => Ok(TabularFormat::Json),
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Ok(TabularFormat::Workbook),
            Some("numbers") => Err(BaselineError::UnsupportedFormat(
                ".numbers files must be exported to xlsx, CSV or JSON".to_string(),
            )),
            _ => Ok(TabularFormat::Csv),
        }
    }

    pub fn parse(self, bytes: &[u8]) -> Result<Vec<BaselineRecord>, BaselineError> {
        match self {
            TabularFormat::Csv => parse_csv(bytes),
            TabularFormat::Json => parse_json(bytes),
            TabularFormat::Workbook => parse_workbook(bytes),
        }
    }
}

/// Async provider of baseline rows.
#[async_trait]
pub trait BaselineSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<BaselineRecord>, BaselineError>;

    /// Human-readable location, for logs and notices.
    fn describe(&self) -> String;
}

/// Build a source from a CLI/env location: `http(s)://` URLs download, anything
/// else is a local file path.
pub fn source_from_location(location: &str) -> Result<Box<dyn BaselineSource>, BaselineError> {
    let location = location.trim();
    let format = TabularFormat::detect(location)?;

    let lower = location.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(Box::new(HttpSource::new(location, format)))
    } else {
        Ok(Box::new(FileSource::new(location, format)))
    }
}

/// Fixed rows held in memory (fixtures, embedding hosts).
#[derive(Debug, Clone, Default)]
pub struct RecordsSource {
    records: Vec<BaselineRecord>,
}

impl RecordsSource {
    pub fn new(records: Vec<BaselineRecord>) -> Self {
        Self { records }
    }

    /// One record per code under the `Codigo` header.
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            codes
                .into_iter()
                .map(|code| BaselineRecord::new().with("Codigo", Into::<String>::into(code)))
                .collect(),
        )
    }
}

#[async_trait]
impl BaselineSource for RecordsSource {
    async fn fetch(&self) -> Result<Vec<BaselineRecord>, BaselineError> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory baseline ({} rows)", self.records.len())
    }
}
