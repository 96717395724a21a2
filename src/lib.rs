//! hf-export: fetch a HuggingFace dataset split and preview it or export it to CSV.
//!
//! The pipeline is strictly linear: [`hub`] fetches a split into
//! [`record::Split`], [`table::Table`] materializes it, and [`export`]
//! prints or writes it.

pub mod cli;
pub mod error;
pub mod export;
pub mod hub;
pub mod pipeline;
pub mod record;
pub mod table;

pub use error::{ExportError, FetchError};
pub use record::{Record, Split, Value};
pub use table::Table;
