//! Record-level data model for fetched dataset splits.
//!
//! A [`Split`] is an ordered list of [`Record`]s, and each record is an
//! ordered list of named [`Value`]s decoded from Arrow record batches.

use std::fmt;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type, UInt64Type};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};

/// A single cell value.
///
/// Arrow types without a direct variant (lists, structs, dates, binary)
/// are kept as their Arrow display text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Python-style literal, as used when printing a whole record.
    ///
    /// Strings are single-quoted unless they contain a single quote and no
    /// double quote, in which case they are double-quoted unescaped.
    pub fn repr(&self) -> String {
        match self {
            Value::Null => "None".to_string(),
            Value::Text(s) => {
                let quote = if s.contains('\'') && !s.contains('"') {
                    '"'
                } else {
                    '\''
                };
                let mut out = String::with_capacity(s.len() + 2);
                out.push(quote);
                for c in s.chars() {
                    match c {
                        '\\' => out.push_str("\\\\"),
                        '\n' => out.push_str("\\n"),
                        '\r' => out.push_str("\\r"),
                        '\t' => out.push_str("\\t"),
                        c if c == quote => {
                            out.push('\\');
                            out.push(c);
                        }
                        c => out.push(c),
                    }
                }
                out.push(quote);
                out
            }
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    /// Plain cell text: nulls and NaN are empty, booleans are `True`/`False`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(v) => write!(f, "{}", v),
            Value::UInt(v) => write!(f, "{}", v),
            Value::Float(v) if v.is_nan() => Ok(()),
            Value::Float(v) => f.write_str(&format_float(*v)),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// Shortest round-trip float text with Python's layout: positional with a
/// trailing `.0` in `[1e-4, 1e16)`, otherwise `1e-05` / `1.5e+16`.
pub fn format_float(v: f64) -> String {
    let abs = v.abs();
    if !v.is_finite() || abs == 0.0 || (1e-4..1e16).contains(&abs) {
        return format!("{:?}", v);
    }
    let sci = format!("{:e}", v);
    match sci.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => sci,
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

/// One item of a split: field names mapped to values, in schema order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, replacing the value if the name is already present.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn into_fields(self) -> Vec<(String, Value)> {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A named partition of a dataset, read-only once fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    name: String,
    records: Vec<Record>,
}

impl Split {
    pub fn new(name: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Decode every row of a record batch into a [`Record`], fields in schema order.
pub fn records_from_batch(batch: &RecordBatch) -> Result<Vec<Record>, ArrowError> {
    let schema = batch.schema();
    let columns = batch
        .columns()
        .iter()
        .map(column_values)
        .collect::<Result<Vec<_>, _>>()?;

    let mut records = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        let fields = schema
            .fields()
            .iter()
            .zip(&columns)
            .map(|(field, values)| (field.name().clone(), values[row].clone()))
            .collect();
        records.push(Record { fields });
    }
    Ok(records)
}

fn column_values(array: &ArrayRef) -> Result<Vec<Value>, ArrowError> {
    let len = array.len();
    let values = match array.data_type() {
        DataType::Null => vec![Value::Null; len],
        DataType::Boolean => {
            let arr = array.as_boolean();
            (0..len)
                .map(|i| nullable(arr, i, || Value::Bool(arr.value(i))))
                .collect()
        }
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => {
            let widened = cast(array, &DataType::Int64)?;
            let arr = widened.as_primitive::<Int64Type>();
            (0..len)
                .map(|i| nullable(arr, i, || Value::Int(arr.value(i))))
                .collect()
        }
        DataType::UInt64 => {
            let arr = array.as_primitive::<UInt64Type>();
            (0..len)
                .map(|i| nullable(arr, i, || Value::UInt(arr.value(i))))
                .collect()
        }
        DataType::Float16 | DataType::Float32 | DataType::Float64 => {
            let widened = cast(array, &DataType::Float64)?;
            let arr = widened.as_primitive::<Float64Type>();
            (0..len)
                .map(|i| nullable(arr, i, || Value::Float(arr.value(i))))
                .collect()
        }
        DataType::Utf8 => {
            let arr = array.as_string::<i32>();
            (0..len)
                .map(|i| nullable(arr, i, || Value::Text(arr.value(i).to_string())))
                .collect()
        }
        DataType::LargeUtf8 => {
            let arr = array.as_string::<i64>();
            (0..len)
                .map(|i| nullable(arr, i, || Value::Text(arr.value(i).to_string())))
                .collect()
        }
        _ => {
            let options = FormatOptions::default();
            let formatter = ArrayFormatter::try_new(array.as_ref(), &options)?;
            (0..len)
                .map(|i| nullable(array, i, || Value::Text(formatter.value(i).to_string())))
                .collect()
        }
    };
    Ok(values)
}

fn nullable(array: &dyn Array, index: usize, value: impl FnOnce() -> Value) -> Value {
    if array.is_null(index) {
        Value::Null
    } else {
        value()
    }
}
