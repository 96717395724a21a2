//! CSV export of a full table.
//!
//! The file has a header row, no index column, comma delimiter, and
//! replaces any existing file at the destination.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ExportError;
use crate::record::Value;
use crate::table::Table;

/// What was written by [`write_csv`].
#[derive(Debug, Clone, Serialize)]
pub struct CsvSummary {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: Vec<String>,
}

/// Write `table` to `path` as CSV, truncating any existing file.
///
/// Parent directories are not created.
pub fn write_csv(table: &Table, path: &Path) -> Result<CsvSummary, ExportError> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(Value::to_string))?;
    }
    writer.flush()?;

    tracing::info!(
        path = %path.display(),
        rows = table.num_rows(),
        columns = table.num_columns(),
        "CSV file written"
    );

    Ok(CsvSummary {
        path: path.to_path_buf(),
        rows: table.num_rows(),
        columns: table.columns().to_vec(),
    })
}

/// Read a CSV file back into a table. Every cell is text; empty cells are null.
pub fn read_csv(path: &Path) -> Result<Table, ExportError> {
    let mut reader = csv::Reader::from_path(path)?;
    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row = record
            .iter()
            .map(|cell| {
                if cell.is_empty() {
                    Value::Null
                } else {
                    Value::from(cell)
                }
            })
            .collect();
        rows.push(row);
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), "CSV file loaded");

    Ok(Table::new(columns, rows))
}
