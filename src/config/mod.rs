pub mod args;
mod structs;
pub mod validators;

pub use args::{Cli, Command, ConfigAction};
pub use structs::*;
