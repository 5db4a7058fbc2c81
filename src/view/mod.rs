//! View-state core: membership, projection, navigation and the orchestrating
//! engine. Nothing in here performs I/O or returns an error.

pub mod engine;
pub mod membership;
pub mod navigation;
pub mod projection;

pub use engine::{CurrentView, ReplaceOutcome, SelectOutcome, TableModel, ViewState};
pub use membership::belongs_to;
pub use navigation::{Navigation, View};
pub use projection::{Projectable, project};
