mod commands;
mod history;
pub mod merge;

pub use commands::{Command, PropertyChange};
pub use history::{DEFAULT_MAX_HISTORY, History};
