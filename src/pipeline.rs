//! The two fetch -> transform -> emit pipelines.
//!
//! Each runs to completion or stops at the first error; nothing is written
//! when fetching fails.

use std::path::Path;

use anyhow::Context;

use crate::export::{self, CsvSummary};
use crate::hub::{self, DatasetSource, FetchOptions, HubConfig};
use crate::record::Split;
use crate::table::Table;

/// Fetch a split, attaching the dataset and split to any error.
pub async fn fetch_split(
    source: &DatasetSource,
    hub_config: &HubConfig,
    options: &FetchOptions,
) -> anyhow::Result<Split> {
    hub::fetch(source, hub_config, options)
        .await
        .with_context(|| format!("Failed to load split '{}' of {}", options.split, source))
}

/// Fetch a split and materialize it as a table.
pub async fn fetch_table(
    source: &DatasetSource,
    hub_config: &HubConfig,
    options: &FetchOptions,
) -> anyhow::Result<Table> {
    let split = fetch_split(source, hub_config, options).await?;
    Ok(Table::from_split(split))
}

/// Print the first record of the split, then the first `rows` rows of its table.
pub async fn run_preview(
    source: &DatasetSource,
    hub_config: &HubConfig,
    options: &FetchOptions,
    rows: usize,
) -> anyhow::Result<Table> {
    let split = fetch_split(source, hub_config, options).await?;

    let first = split
        .get(0)
        .cloned()
        .with_context(|| format!("Split '{}' of {} is empty", split.name(), source))?;
    let table = Table::from_split(split);

    export::print_first_record(&first);
    export::print_head(&table, rows)?;

    Ok(table)
}

/// Write the whole split to `output` as CSV.
pub async fn run_export(
    source: &DatasetSource,
    hub_config: &HubConfig,
    options: &FetchOptions,
    output: &Path,
) -> anyhow::Result<CsvSummary> {
    let table = fetch_table(source, hub_config, options).await?;
    let summary = export::write_csv(&table, output)
        .with_context(|| format!("Failed to write CSV file {}", output.display()))?;
    Ok(summary)
}
