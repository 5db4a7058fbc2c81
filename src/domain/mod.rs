//! Domain types shared by the core, the data providers and the front-ends.
//!
//! This module defines:
//!
//! - remote records (`IndexRecord`, `InstrumentRecord`)
//! - the sort directive (`SortKey`, `SortDirection`, `SortDirective`)
//! - the presentation row (`RowView`) and run configuration (`RadarConfig`)
//! - lenient field normalization (`normalize`)

pub mod normalize;
pub mod types;

pub use types::*;
