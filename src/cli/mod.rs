pub mod commands;
pub mod handlers;

pub use commands::{CliArgs, Commands, PatchArgs, ScaffoldArgs};
pub use handlers::{handle_patch, handle_scaffold};
