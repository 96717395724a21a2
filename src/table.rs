//! Row-major table materialized from a split.

use std::collections::HashMap;

use crate::record::{Split, Value};

/// In-memory table with a fixed column set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table from already-aligned columns and rows.
    ///
    /// Short rows are padded with nulls and long rows are truncated so every
    /// row has exactly one value per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Null);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Columns are the union of record field names in first-seen order; a
    /// field missing from a record is null in that row. Values move out of
    /// the split, so the records are never held twice.
    pub fn from_split(split: Split) -> Self {
        let name = split.name().to_string();
        let records = split.into_records();

        let mut columns: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for record in &records {
            for field in record.field_names() {
                if !index.contains_key(field) {
                    index.insert(field.to_string(), columns.len());
                    columns.push(field.to_string());
                }
            }
        }

        let rows: Vec<Vec<Value>> = records
            .into_iter()
            .map(|record| {
                let mut row = vec![Value::Null; columns.len()];
                for (field, value) in record.into_fields() {
                    row[index[&field]] = value;
                }
                row
            })
            .collect();

        tracing::debug!(
            split = %name,
            rows = rows.len(),
            columns = columns.len(),
            "Split converted to table"
        );

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[Value]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// First `n` rows, or all of them when the table is shorter.
    pub fn head(&self, n: usize) -> &[Vec<Value>] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
