//! `bist-radar` library crate.
//!
//! The binary (`radar`) is a thin wrapper around this library so that:
//!
//! - the view engine is testable without a terminal or network
//! - data providers can be swapped (remote tables, snapshot files, generated data)
//! - front-ends (plain tables, TUI) share one source of truth for what is shown

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
pub mod tui;
pub mod view;
