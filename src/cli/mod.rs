//! Command-line interface for hf-export.
//!
//! Provides the `preview` and `export` commands.

mod commands;

pub use commands::{
    parse_cli, run_with_cli, Cli, Commands, ExportArgs, HubArgs, PreviewArgs,
};
