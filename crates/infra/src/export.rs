//! Spreadsheet export: a `codigo`/`estado` table as CSV or xlsx.

use std::io;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use thiserror::Error;

use stocktake_inventory::ExportRow;

const HEADER: [&str; 2] = ["codigo", "estado"];
const SHEET_NAME: &str = "Inventario";

#[derive(Debug, Error)]
pub enum ExportWriteError {
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to encode workbook: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("failed to write export file: {0}")]
    Io(#[from] io::Error),
}

/// Output encoding, chosen from the target file extension.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    /// `.xlsx` writes a workbook; anything else is CSV.
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => ExportFormat::Xlsx,
            _ => ExportFormat::Csv,
        }
    }
}

/// Write rows to `path` in the format its extension names.
pub fn write_file(rows: &[ExportRow], path: &Path) -> Result<ExportFormat, ExportWriteError> {
    let format = ExportFormat::detect(path);
    match format {
        ExportFormat::Csv => write_csv_file(rows, path)?,
        ExportFormat::Xlsx => write_xlsx_file(rows, path)?,
    }
    Ok(format)
}

/// Write rows (header first) to any writer.
pub fn write_csv<W: io::Write>(rows: &[ExportRow], writer: W) -> Result<(), ExportWriteError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    // Header comes from the serde field names of `ExportRow`.
    for row in rows {
        csv_writer.serialize(row)?;
    }
    if rows.is_empty() {
        csv_writer.write_record(HEADER)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write rows to `path`, replacing any existing file.
pub fn write_csv_file(rows: &[ExportRow], path: &Path) -> Result<(), ExportWriteError> {
    create_parent(path)?;
    let file = std::fs::File::create(path)?;
    write_csv(rows, io::BufWriter::new(file))
}

/// Single-sheet workbook: bold header row, then one row per item.
pub fn xlsx_bytes(rows: &[ExportRow]) -> Result<Vec<u8>, ExportWriteError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet().set_name(SHEET_NAME)?;

    for (col, title) in HEADER.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &bold)?;
    }
    for (idx, row) in rows.iter().enumerate() {
        let line = idx as u32 + 1;
        sheet.write_string(line, 0, &row.code)?;
        sheet.write_string(line, 1, row.estado.as_str())?;
    }

    Ok(workbook.save_to_buffer()?)
}

pub fn write_xlsx_file(rows: &[ExportRow], path: &Path) -> Result<(), ExportWriteError> {
    let bytes = xlsx_bytes(rows)?;
    create_parent(path)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

fn create_parent(path: &Path) -> io::Result<()> {
    match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => std::fs::create_dir_all(parent),
        None => Ok(()),
    }
}
