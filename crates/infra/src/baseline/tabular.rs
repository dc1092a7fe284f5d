use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use serde_json::Value;

use stocktake_inventory::BaselineRecord;

use super::BaselineError;

const CANDIDATE_DELIMITERS: [u8; 3] = [b',', b';', b'\t'];

/// Parse a CSV dataset with a header row.
///
/// UTF-8 is tried first, then Windows-1252 (spreadsheet exports on Windows). The
/// delimiter is whichever of `,` `;` tab occurs most in the header line.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<BaselineRecord>, BaselineError> {
    let text = decode_text(bytes);
    let text = strip_bom(&text);
    let delimiter = sniff_delimiter(text);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| BaselineError::Parse(format!("invalid CSV header: {e}")))?
        .clone();

    let mut records = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = row.map_err(|e| BaselineError::Parse(format!("invalid CSV row {}: {e}", line + 2)))?;
        let record: BaselineRecord = headers
            .iter()
            .zip(row.iter())
            .map(|(header, cell)| (header.to_string(), Value::String(cell.to_string())))
            .collect();
        if !record.is_empty() {
            records.push(record);
        }
    }

    Ok(records)
}

/// Parse a JSON array of row objects.
pub fn parse_json(bytes: &[u8]) -> Result<Vec<BaselineRecord>, BaselineError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    serde_json::from_slice(bytes).map_err(|e| BaselineError::Parse(format!("invalid JSON baseline: {e}")))
}

/// Parse the first sheet of a workbook (xlsx, xlsm, xlsb, xls, ods).
///
/// The first row is the header; every cell is read as text so numeric codes
/// keep their digits.
pub fn parse_workbook(bytes: &[u8]) -> Result<Vec<BaselineRecord>, BaselineError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| BaselineError::Parse(format!("failed to open workbook: {e}")))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| BaselineError::Parse(format!("failed to read first sheet: {e}")))?,
        None => return Err(BaselineError::Parse("workbook contains no sheets".to_string())),
    };

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<Option<String>> = header_row
        .iter()
        .map(|cell| data_text(cell).map(|text| text.trim().to_string()))
        .collect();

    let mut records = Vec::new();
    for row in rows {
        let record: BaselineRecord = headers
            .iter()
            .zip(row.iter())
            .filter_map(|(header, cell)| Some((header.clone()?, Value::String(data_text(cell)?))))
            .collect();
        if !record.is_empty() {
            records.push(record);
        }
    }

    Ok(records)
}

fn data_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(n) => n.to_string(),
        // Integral floats are how spreadsheets store numeric codes.
        Data::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => (*n as i64).to_string(),
        Data::Float(n) => n.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::Error(_) => return None,
    };
    if text.is_empty() { None } else { Some(text) }
}

fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        // Windows-1252 is what Excel writes on Windows; a superset of Latin-1
        // for printable characters.
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().find(|line| !line.trim().is_empty()).unwrap_or("");

    let mut best = b',';
    let mut best_count = 0;
    for delimiter in CANDIDATE_DELIMITERS {
        let count = header.bytes().filter(|&b| b == delimiter).count();
        if count > best_count {
            best = delimiter;
            best_count = count;
        }
    }
    best
}
