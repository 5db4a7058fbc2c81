//! Tracing subscriber setup.
//!
//! `RUST_LOG` always wins over the default level. The TUI owns the terminal,
//! so it only logs when a log file is given.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    Discard,
}

pub fn init_logging(log_file: Option<&Path>, sink: LogSink, verbose: bool) -> Result<(), AppError> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match (log_file, sink) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| AppError::usage(format!("Failed to open log file '{}': {e}", path.display())))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        (None, LogSink::Stderr) => builder.with_writer(std::io::stderr).try_init(),
        (None, LogSink::Discard) => builder.with_writer(std::io::sink).try_init(),
    };

    result.map_err(|e| AppError::new(4, format!("Failed to initialize logging: {e}")))
}
