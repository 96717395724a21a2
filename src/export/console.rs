//! Human-readable previews of a split on standard output.

use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::record::{Record, Value};
use crate::table::Table;

/// Cells longer than this are cut and end in `...`.
pub const MAX_CELL_WIDTH: usize = 50;

/// Default number of rows shown by [`print_head`].
pub const DEFAULT_HEAD_ROWS: usize = 5;

/// One-line mapping of a record, e.g. `{'text': 'Breaking...', 'label': 0}`.
pub fn format_record(record: &Record) -> String {
    let fields: Vec<String> = record
        .fields()
        .map(|(name, value)| format!("{}: {}", Value::from(name).repr(), value.repr()))
        .collect();
    format!("{{{}}}", fields.join(", "))
}

/// Boxed table of the first `n` rows, prefixed by a row index column.
pub fn format_head(table: &Table, n: usize) -> Result<String, ArrowError> {
    let rows = table.head(n);

    let mut fields = vec![Field::new("", DataType::Utf8, false)];
    fields.extend(
        table
            .columns()
            .iter()
            .map(|name| Field::new(name, DataType::Utf8, true)),
    );

    let index: StringArray = (0..rows.len()).map(|i| Some(i.to_string())).collect();
    let mut columns: Vec<ArrayRef> = vec![Arc::new(index)];
    for col in 0..table.num_columns() {
        let values: StringArray = rows
            .iter()
            .map(|row| {
                let value = &row[col];
                if value.is_null() {
                    None
                } else {
                    Some(truncate_cell(&value.to_string()))
                }
            })
            .collect();
        columns.push(Arc::new(values));
    }

    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
    Ok(pretty_format_batches(&[batch])?.to_string())
}

/// Flatten control characters and cut the cell to [`MAX_CELL_WIDTH`] characters.
pub fn truncate_cell(text: &str) -> String {
    let flat = text.replace('\r', "\\r").replace('\n', "\\n");
    if flat.chars().count() <= MAX_CELL_WIDTH {
        return flat;
    }
    let cut: String = flat.chars().take(MAX_CELL_WIDTH - 3).collect();
    format!("{}...", cut)
}

pub fn print_first_record(record: &Record) {
    println!("{}", format_record(record));
}

pub fn print_head(table: &Table, n: usize) -> Result<(), ArrowError> {
    println!("{}", format_head(table, n)?);
    Ok(())
}
