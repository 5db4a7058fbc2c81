//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - loads datasets (remote, snapshot file, or generated fallback)
//! - drives the view engine for printing, exporting, or the TUI

use std::time::Duration;

use clap::Parser;

use crate::cli::{Command, ExportArgs, IndicesArgs, MembersArgs, SortArgs, SourceArgs, TuiArgs};
use crate::domain::{RadarConfig, SortDirection, SortDirective, Snapshot};
use crate::error::AppError;
use crate::logging::LogSink;
use crate::view::{CurrentView, SelectOutcome};

pub mod pipeline;

/// Entry point for the `radar` binary.
pub fn run() -> Result<(), AppError> {
    // `radar` and `radar --offline` behave like `radar tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let sink = match cli.command {
        Command::Tui(_) => LogSink::Discard,
        _ => LogSink::Stderr,
    };
    crate::logging::init_logging(cli.log_file.as_deref(), sink, cli.verbose)?;

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Indices(args) => handle_indices(args),
        Command::Members(args) => handle_members(args),
        Command::Export(args) => handle_export(args),
    }
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let config = radar_config_from_args(&args.source, Some(&args.sort), &args.search);
    crate::tui::run(config)
}

fn handle_indices(args: IndicesArgs) -> Result<(), AppError> {
    let config = radar_config_from_args(&args.source, Some(&args.sort), &args.search);
    let snapshot = pipeline::load_snapshot(&config)?;
    print_header(&snapshot);

    let mut state = pipeline::new_view_state(&config);
    state.replace(snapshot.datasets);

    println!("Sector rotations");
    print!("{}", crate::report::format_table(&state.table()));
    Ok(())
}

fn handle_members(args: MembersArgs) -> Result<(), AppError> {
    let config = radar_config_from_args(&args.source, Some(&args.sort), "");
    let snapshot = pipeline::load_snapshot(&config)?;
    print_header(&snapshot);

    let mut state = pipeline::new_view_state(&config);
    state.replace(snapshot.datasets);
    if state.on_select_parent(&args.code) == SelectOutcome::UnknownParent {
        println!("Unknown index code: {}", args.code);
    }
    // Selecting resets the sort; re-apply the requested one.
    apply_sort(&mut state, config.sort);

    if let CurrentView::Detail {
        code,
        parent: Some(parent),
    } = state.current_view()
    {
        println!("{} ({code})", parent.name);
    }
    print!("{}", crate::report::format_table(&state.table()));
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let config = radar_config_from_args(&args.source, None, "");
    let snapshot = pipeline::load_snapshot(&config)?;
    print_header(&snapshot);

    crate::io::write_snapshot_json(&args.out, &snapshot.datasets)?;
    println!(
        "Wrote snapshot: {} ({} indices, {} instruments)",
        args.out.display(),
        snapshot.datasets.indices.len(),
        snapshot.datasets.instruments.len()
    );
    Ok(())
}

fn print_header(snapshot: &Snapshot) {
    println!("=== radar - BIST index radar ===");
    println!("{}", crate::report::format_updated(snapshot.datasets.as_of));
    if let Some(banner) = crate::report::source_banner(&snapshot.source) {
        println!("{banner}");
    }
    println!();
}

/// Drive the engine's click-based sort transitions to reach `target`.
fn apply_sort(state: &mut crate::view::ViewState, target: SortDirective) {
    if state.sort().key != target.key {
        state.on_sort(target.key);
    }
    if state.sort().direction != target.direction {
        state.on_sort(target.key);
    }
}

pub fn radar_config_from_args(source: &SourceArgs, sort: Option<&SortArgs>, search: &str) -> RadarConfig {
    let sort = sort
        .map(|s| {
            let direction = if s.asc { SortDirection::Asc } else { SortDirection::Desc };
            SortDirective::new(s.sort, direction)
        })
        .unwrap_or_default();

    RadarConfig {
        offline: source.offline,
        data_file: source.data.clone(),
        seed: source.seed,
        timeout: Duration::from_secs(source.timeout_secs.max(1)),
        sort,
        search: search.to_string(),
    }
}

/// Rewrite argv so `radar` defaults to `radar tui`.
///
/// Rules:
/// - `radar`                      -> `radar tui`
/// - `radar --offline ...`        -> `radar tui --offline ...`
/// - `radar --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "indices" | "members" | "export");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
