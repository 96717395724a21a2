//! Dataset splits stored as parquet files on the local filesystem.
//!
//! Accepts either a single `.parquet` file or a directory laid out the way
//! Hub dataset repos are: `{split}.parquet`, or `{split}-00000-of-00002.parquet`
//! style shards, at the top level or under `data/`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::FetchError;
use crate::record::{Record, Split};

use super::read_parquet_file;

/// Load `split` from a local parquet file or dataset directory.
pub fn load_local_split(path: &Path, split: &str) -> Result<Split, FetchError> {
    if path.is_file() {
        let records = read_parquet_file(path)?;
        return Ok(Split::new(split, records));
    }

    if !path.is_dir() {
        return Err(FetchError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!(
                "Path is neither a parquet file nor a directory: {}",
                path.display()
            ),
        )));
    }

    let shards = split_files(path, split)?;
    if shards.is_empty() {
        return Err(FetchError::SplitNotFound {
            split: split.to_string(),
            available: available_splits(path)?,
        });
    }

    let mut records: Vec<Record> = Vec::new();
    for shard in &shards {
        records.extend(read_parquet_file(shard)?);
    }

    tracing::info!(
        path = %path.display(),
        split = split,
        shards = shards.len(),
        rows = records.len(),
        "Split loaded from local directory"
    );

    Ok(Split::new(split, records))
}

/// Parquet files belonging to `split`, in shard order.
pub fn split_files(dir: &Path, split: &str) -> Result<Vec<PathBuf>, FetchError> {
    let exact = format!("{}.parquet", split);
    let prefix = format!("{}-", split);

    for candidate in search_dirs(dir) {
        let files = parquet_files(&candidate)?;

        if let Some(file) = files.iter().find(|f| file_name(f) == exact) {
            return Ok(vec![file.clone()]);
        }

        let shards: Vec<PathBuf> = files
            .into_iter()
            .filter(|f| file_name(f).starts_with(&prefix))
            .collect();
        if !shards.is_empty() {
            return Ok(shards);
        }
    }

    Ok(Vec::new())
}

/// Split names discovered from parquet file names, sorted and deduplicated.
pub fn available_splits(dir: &Path) -> Result<Vec<String>, FetchError> {
    let mut splits = BTreeSet::new();
    for candidate in search_dirs(dir) {
        for file in parquet_files(&candidate)? {
            let name = file_name(&file);
            let stem = name.trim_end_matches(".parquet");
            let split = stem.split_once('-').map(|(s, _)| s).unwrap_or(stem);
            splits.insert(split.to_string());
        }
    }
    Ok(splits.into_iter().collect())
}

fn search_dirs(dir: &Path) -> Vec<PathBuf> {
    let mut dirs = vec![dir.to_path_buf()];
    let data = dir.join("data");
    if data.is_dir() {
        dirs.push(data);
    }
    dirs
}

fn parquet_files(dir: &Path) -> Result<Vec<PathBuf>, FetchError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().map(|x| x == "parquet").unwrap_or(false))
        .collect();
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
