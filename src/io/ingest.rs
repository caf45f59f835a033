//! CSV ingest for one year's sales file.
//!
//! This module turns a delimited text source into `RawYearRow`s.
//!
//! Design goals:
//! - **Strict schema** for the key columns (`date`, `Season`, `Item`)
//! - **Cell-level tolerance** for numeric columns (kept as strings, parsed at merge)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **No aggregation logic here**

use std::collections::HashMap;
use std::io::Read;

use csv::StringRecord;

use crate::domain::{RawYearRow, RowError};
use crate::error::AppError;

const REQUIRED_COLUMNS: [&str; 3] = ["date", "season", "item"];

/// Rows read from one source plus what went wrong along the way.
#[derive(Debug, Clone, Default)]
pub struct IngestedRows {
    pub rows: Vec<RawYearRow>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Read one year's CSV from any reader.
///
/// `label` names the source in error messages (usually the path or URL).
pub fn read_year_rows<R: Read>(reader: R, label: &str) -> Result<IngestedRows, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::data_unavailable(format!("Failed to read CSV headers from '{label}': {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map, label)?;

    let mut out = IngestedRows::default();

    for (idx, result) in reader.records().enumerate() {
        let line = record_line(&result).unwrap_or(idx + 2);
        out.rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(source = label, line, "skipping unreadable CSV row: {e}");
                out.row_errors.push(RowError {
                    line,
                    message: format!("{label}: CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(row) => out.rows.push(row),
            Err(message) => {
                tracing::warn!(source = label, line, "skipping row: {message}");
                out.row_errors.push(RowError {
                    line,
                    message: format!("{label}: {message}"),
                });
            }
        }
    }

    tracing::debug!(
        source = label,
        rows_read = out.rows_read,
        rows_used = out.rows.len(),
        row_errors = out.row_errors.len(),
        "ingested year file"
    );

    Ok(out)
}

/// Physical line a record starts on; quoted fields may span several lines.
fn record_line(result: &Result<StringRecord, csv::Error>) -> Option<usize> {
    let position = match result {
        Ok(record) => record.position(),
        Err(e) => e.position(),
    }?;
    usize::try_from(position.line()).ok()
}

/// Convenience wrapper for in-memory text (e.g. an HTTP response body).
pub fn read_year_rows_from_str(text: &str, label: &str) -> Result<IngestedRows, AppError> {
    read_year_rows(text.as_bytes(), label)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>, label: &str) -> Result<(), AppError> {
    for name in REQUIRED_COLUMNS {
        if !header_map.contains_key(name) {
            return Err(AppError::data_unavailable(format!(
                "'{label}' is not a sales file: missing required column `{name}`."
            )));
        }
    }
    Ok(())
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<RawYearRow, String> {
    let date = get_cell(record, header_map, "date");
    if date.is_empty() {
        return Err("Missing required value: `date`".to_string());
    }

    Ok(RawYearRow {
        date,
        season: get_cell(record, header_map, "season"),
        item: get_cell(record, header_map, "item"),
        msrp: get_cell(record, header_map, "msrp"),
        revenue: get_cell(record, header_map, "revenue"),
        cogs: get_cell(record, header_map, "cogs"),
        discount: get_cell(record, header_map, "discount"),
    })
}

/// Cell value by column name; missing columns and short rows read as "".
fn get_cell(record: &StringRecord, header_map: &HashMap<String, usize>, name: &str) -> String {
    header_map
        .get(name)
        .and_then(|&idx| record.get(idx))
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}
