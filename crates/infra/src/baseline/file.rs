use std::path::PathBuf;

use async_trait::async_trait;

use stocktake_inventory::BaselineRecord;

use super::{BaselineError, BaselineSource, TabularFormat};

/// Baseline read from a local CSV, JSON or workbook file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    format: TabularFormat,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, format: TabularFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }
}

#[async_trait]
impl BaselineSource for FileSource {
    async fn fetch(&self) -> Result<Vec<BaselineRecord>, BaselineError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|source| BaselineError::Io {
            location: self.describe(),
            source,
        })?;

        let records = self.format.parse(&bytes)?;
        tracing::debug!(path = %self.path.display(), rows = records.len(), "baseline file read");
        Ok(records)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventario.csv");
        std::fs::write(&path, "Codigo\nB1000001\nB1000002\n").unwrap();

        let records = FileSource::new(&path, TabularFormat::Csv).fetch().await.unwrap();

        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn reads_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventario.json");
        std::fs::write(&path, r#"[{"Codigo":"B1000001"}]"#).unwrap();

        let records = FileSource::new(&path, TabularFormat::Json).fetch().await.unwrap();

        assert_eq!(records[0].code_text().as_deref(), Some("B1000001"));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("missing.csv"), TabularFormat::Csv);

        match source.fetch().await {
            Err(BaselineError::Io { location, .. }) => assert!(location.ends_with("missing.csv")),
            other => panic!("Expected Io error, got {other:?}"),
        }
    }
}
