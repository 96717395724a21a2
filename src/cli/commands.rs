//! CLI command definitions for hf-export.
//!
//! Each subcommand is one standalone pipeline. Flag defaults point at the
//! fake-news datasets, so `hf-export preview` and `hf-export export`
//! need no arguments.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Serialize;
use tracing::info;

use crate::export::CsvSummary;
use crate::hub::{DatasetSource, FetchOptions, HubConfig, DEFAULT_ENDPOINT};
use crate::pipeline;

/// Dataset previewed by default.
const DEFAULT_PREVIEW_DATASET: &str = "argilla/news-fakenews";

/// Dataset exported by default.
const DEFAULT_EXPORT_DATASET: &str = "mrm8488/fake-news";

const DEFAULT_SPLIT: &str = "train";
const DEFAULT_CACHE_DIR: &str = "./";
const DEFAULT_CSV_PATH: &str = "./fakenews.csv";

/// Fetch a HuggingFace dataset split and preview it or export it to CSV.
#[derive(Parser)]
#[command(name = "hf-export")]
#[command(about = "Fetch a HuggingFace dataset split and preview it or export it to CSV")]
#[command(version)]
#[command(
    long_about = "hf-export downloads one split of a HuggingFace dataset (via the Hub's parquet conversion) and either prints a preview or writes the whole split to a CSV file.\n\nExample usage:\n  hf-export preview\n  hf-export export --dataset mrm8488/fake-news --output ./fakenews.csv"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Print the first record of a split and the first rows of its table.
    #[command(alias = "head")]
    Preview(PreviewArgs),

    /// Write a whole split to a CSV file (header row, no index column).
    #[command(alias = "csv")]
    Export(ExportArgs),
}

/// Hub connection flags shared by every subcommand.
#[derive(clap::Args, Debug, Clone)]
pub struct HubArgs {
    /// Hub endpoint.
    #[arg(long, env = "HF_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// HuggingFace API token for gated or private datasets.
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    pub hf_token: Option<String>,
}

impl HubArgs {
    pub fn hub_config(&self) -> HubConfig {
        HubConfig::default()
            .with_endpoint(self.endpoint.clone())
            .with_token(self.hf_token.clone())
    }
}

/// Arguments for `hf-export preview`.
#[derive(Parser, Debug)]
pub struct PreviewArgs {
    /// HuggingFace dataset repo ID (e.g. "argilla/news-fakenews") or local parquet path.
    #[arg(short = 'd', long, default_value = DEFAULT_PREVIEW_DATASET)]
    pub dataset: String,

    /// Dataset split to load.
    #[arg(short = 's', long, default_value = DEFAULT_SPLIT)]
    pub split: String,

    /// Dataset config (subset) name. Defaults to the dataset's only or "default" config.
    #[arg(long)]
    pub config: Option<String>,

    /// Directory the downloaded parquet shards are written to.
    #[arg(long, default_value = DEFAULT_CACHE_DIR)]
    pub cache_dir: PathBuf,

    /// Number of table rows to print.
    #[arg(short = 'n', long, default_value = "5")]
    pub rows: usize,

    #[command(flatten)]
    pub hub: HubArgs,
}

/// Arguments for `hf-export export`.
#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// HuggingFace dataset repo ID (e.g. "mrm8488/fake-news") or local parquet path.
    #[arg(short = 'd', long, default_value = DEFAULT_EXPORT_DATASET)]
    pub dataset: String,

    /// Dataset split to load.
    #[arg(short = 's', long, default_value = DEFAULT_SPLIT)]
    pub split: String,

    /// Dataset config (subset) name. Defaults to the dataset's only or "default" config.
    #[arg(long)]
    pub config: Option<String>,

    /// Directory the downloaded parquet shards are written to (kept in memory when unset).
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Destination CSV file. An existing file is overwritten.
    #[arg(short = 'o', long, default_value = DEFAULT_CSV_PATH)]
    pub output: String,

    /// Output JSON summary.
    #[arg(short = 'j', long)]
    pub json: bool,

    #[command(flatten)]
    pub hub: HubArgs,
}

/// JSON summary printed by `hf-export export --json`.
#[derive(Debug, Serialize)]
struct ExportReport<'a> {
    status: &'static str,
    dataset: String,
    split: &'a str,
    #[serde(flatten)]
    summary: CsvSummary,
}

/// Parse CLI arguments and return the Cli struct.
/// This allows access to global options like log_level before running commands.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI with pre-parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Preview(args) => run_preview_command(args).await,
        Commands::Export(args) => run_export_command(args).await,
    }
}

async fn run_preview_command(args: PreviewArgs) -> anyhow::Result<()> {
    let source = DatasetSource::parse(&args.dataset);
    let options = FetchOptions::new(&args.split)
        .with_config(args.config)
        .with_cache_dir(Some(args.cache_dir));

    info!(dataset = %source, split = %args.split, "Previewing dataset");
    pipeline::run_preview(&source, &args.hub.hub_config(), &options, args.rows).await?;
    Ok(())
}

async fn run_export_command(args: ExportArgs) -> anyhow::Result<()> {
    let source = DatasetSource::parse(&args.dataset);
    let options = FetchOptions::new(&args.split)
        .with_config(args.config)
        .with_cache_dir(args.cache_dir);
    let output = Path::new(&args.output);

    info!(dataset = %source, split = %args.split, output = %args.output, "Exporting dataset");
    let summary =
        pipeline::run_export(&source, &args.hub.hub_config(), &options, output).await?;

    if args.json {
        let report = ExportReport {
            status: "success",
            dataset: source.to_string(),
            split: &args.split,
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("CSV file saved to: {}", args.output);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_fake_news_datasets() {
        let cli = Cli::try_parse_from(["hf-export", "preview"]).unwrap();
        match cli.command {
            Commands::Preview(args) => {
                assert_eq!(args.dataset, "argilla/news-fakenews");
                assert_eq!(args.split, "train");
                assert_eq!(args.cache_dir, PathBuf::from("./"));
                assert_eq!(args.rows, 5);
            }
            _ => panic!("expected preview"),
        }

        let cli = Cli::try_parse_from(["hf-export", "export"]).unwrap();
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.dataset, "mrm8488/fake-news");
                assert_eq!(args.output, "./fakenews.csv");
                assert!(args.cache_dir.is_none());
                assert!(!args.json);
            }
            _ => panic!("expected export"),
        }
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_export_flags() {
        let cli = Cli::try_parse_from([
            "hf-export",
            "--log-level",
            "debug",
            "export",
            "-d",
            "org/data",
            "--split",
            "test",
            "--config",
            "en",
            "-o",
            "/tmp/out.csv",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.log_level, "debug");
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.dataset, "org/data");
                assert_eq!(args.split, "test");
                assert_eq!(args.config.as_deref(), Some("en"));
                assert_eq!(args.output, "/tmp/out.csv");
                assert!(args.json);
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_export_report_json() {
        let report = ExportReport {
            status: "success",
            dataset: "org/data".to_string(),
            split: "test",
            summary: CsvSummary {
                path: PathBuf::from("/tmp/out.csv"),
                rows: 3,
                columns: vec!["text".to_string(), "label".to_string()],
            },
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["dataset"], "org/data");
        assert_eq!(json["split"], "test");
        assert_eq!(json["rows"], 3);
        assert_eq!(json["columns"], serde_json::json!(["text", "label"]));
        assert_eq!(json["path"], "/tmp/out.csv");
        assert!(json.get("summary").is_none());
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["hf-export", "upload"]).is_err());
    }
}
