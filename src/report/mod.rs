//! Reporting utilities: value formatting and plain-text tables.

pub mod format;

pub use format::{Tone, format_percent, format_price, format_table, format_updated, momentum_fraction, source_banner};
