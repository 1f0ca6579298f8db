//! Selector state, shell commands and the datasets they render from.

mod command;
mod dashboard;
mod datasets;
mod selection;

pub use command::{Command, CommandError, HELP};
pub use dashboard::{Dashboard, Outcome};
pub use datasets::{Datasets, prepare_rivers};
pub use selection::{Overlays, Selection};
