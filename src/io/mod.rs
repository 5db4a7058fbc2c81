//! Input/output helpers.
//!
//! - snapshot JSON read/write and the file-backed provider (`snapshot`)

pub mod snapshot;

pub use snapshot::*;
