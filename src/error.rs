//! Error types for hf-export operations.
//!
//! Defines error types for the two subsystems that can fail:
//! - Fetching a dataset split (Hub API, shard download, parquet decoding)
//! - Exporting a table (CSV write and read-back)

use thiserror::Error;

/// Errors that can occur while fetching a dataset split.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Dataset '{0}' not found on the Hub")]
    DatasetNotFound(String),

    #[error("Access to dataset '{0}' denied: it may be gated or private (set HF_TOKEN)")]
    Unauthorized(String),

    #[error("Config '{config}' not found, available configs: {}", available.join(", "))]
    ConfigNotFound {
        config: String,
        available: Vec<String>,
    },

    #[error("Dataset has several configs, pick one with --config: {}", available.join(", "))]
    ConfigRequired { available: Vec<String> },

    #[error("Split '{split}' not found, available splits: {}", available.join(", "))]
    SplitNotFound {
        split: String,
        available: Vec<String>,
    },

    #[error("Invalid dataset identifier '{0}': expected 'owner/name'")]
    InvalidDatasetId(String),

    #[error("Hub API error ({status}): {body}")]
    Http { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while writing or reading a CSV export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
