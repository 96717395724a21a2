//! Dataset fetching from the HuggingFace Hub or from local parquet files.

pub mod client;
pub mod local;

use std::fs::File;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::ChunkReader;

use crate::error::FetchError;
use crate::record::{records_from_batch, Record, Split};

pub use client::{
    select_shards, shard_cache_path, validate_dataset_id, FetchOptions, HubClient, HubConfig,
    ParquetListing, DEFAULT_CONFIG, DEFAULT_ENDPOINT,
};
pub use local::{available_splits, load_local_split, split_files};

/// Where a dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// Hub dataset repo id, `owner/name`.
    Hub(String),
    /// A parquet file or a directory of parquet files.
    Local(PathBuf),
}

impl DatasetSource {
    /// Existing paths are local sources, anything else is a Hub repo id.
    pub fn parse(source: &str) -> Self {
        let path = Path::new(source);
        if path.exists() {
            DatasetSource::Local(path.to_path_buf())
        } else {
            DatasetSource::Hub(source.to_string())
        }
    }
}

impl std::fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetSource::Hub(repo) => f.write_str(repo),
            DatasetSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetch the split named in `options` from `source`.
pub async fn fetch(
    source: &DatasetSource,
    hub: &HubConfig,
    options: &FetchOptions,
) -> Result<Split, FetchError> {
    match source {
        DatasetSource::Hub(repo_id) => {
            let client = HubClient::new(hub.clone())?;
            client.fetch_split(repo_id, options).await
        }
        DatasetSource::Local(path) => load_local_split(path, &options.split),
    }
}

/// Decode an in-memory parquet file into records.
pub fn decode_parquet(bytes: Bytes) -> Result<Vec<Record>, FetchError> {
    read_parquet(bytes)
}

/// Read a parquet file from disk into records.
pub fn read_parquet_file(path: &Path) -> Result<Vec<Record>, FetchError> {
    let file = File::open(path)?;
    let records = read_parquet(file)?;
    tracing::debug!(
        path = %path.display(),
        rows = records.len(),
        "Parquet file loaded"
    );
    Ok(records)
}

fn read_parquet<R: ChunkReader + 'static>(reader: R) -> Result<Vec<Record>, FetchError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
    let batches = builder.build()?;

    let mut records = Vec::new();
    for batch in batches {
        records.extend(records_from_batch(&batch?)?);
    }
    Ok(records)
}
