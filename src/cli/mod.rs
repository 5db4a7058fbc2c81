//! Command-line parsing for the index radar.
//!
//! The goal of this module is to keep **argument parsing** separate from data
//! loading and the view engine.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::SortKey;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "radar", version, about = "BIST index rotation radar (indices → constituents)")]
pub struct Cli {
    /// Append log output to this file. The TUI only logs when this is set.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log at debug level (RUST_LOG still takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive drill-down table.
    Tui(TuiArgs),
    /// Print the index overview.
    Indices(IndicesArgs),
    /// Print the constituents of one index.
    Members(MembersArgs),
    /// Write the current datasets to a snapshot JSON file.
    Export(ExportArgs),
}

/// Where datasets come from.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Skip the remote source and use generated demo data.
    #[arg(long)]
    pub offline: bool,

    /// Replay a snapshot JSON file (from `radar export`) instead of the remote source.
    #[arg(long, value_name = "JSON")]
    pub data: Option<PathBuf>,

    /// Seed for generated demo data.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Remote request timeout in seconds.
    #[arg(long, default_value_t = 15)]
    pub timeout_secs: u64,
}

/// Initial sort directive.
#[derive(Debug, Args, Clone)]
pub struct SortArgs {
    /// Column to sort by.
    #[arg(long, value_enum, default_value_t = SortKey::Change1w)]
    pub sort: SortKey,

    /// Sort ascending (default is descending).
    #[arg(long)]
    pub asc: bool,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub sort: SortArgs,

    /// Initial index search term.
    #[arg(long, default_value = "")]
    pub search: String,
}

#[derive(Debug, Args, Clone)]
pub struct IndicesArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub sort: SortArgs,

    /// Only show indices whose name or code contains this (case-insensitive).
    #[arg(long, default_value = "")]
    pub search: String,
}

#[derive(Debug, Args, Clone)]
pub struct MembersArgs {
    /// Index code, e.g. XBANK.
    pub code: String,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub sort: SortArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output snapshot path.
    #[arg(long, value_name = "JSON")]
    pub out: PathBuf,
}
