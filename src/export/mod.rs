//! Output sinks for a fetched split.
//!
//! Provides a console preview (first record, head) and a CSV file export.

pub mod console;
pub mod csv_writer;

pub use console::{
    format_head, format_record, print_first_record, print_head, truncate_cell, DEFAULT_HEAD_ROWS,
    MAX_CELL_WIDTH,
};
pub use csv_writer::{read_csv, write_csv, CsvSummary};
