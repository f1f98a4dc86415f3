// CLI module
// Public interface for the interactive shell

mod commands;
mod repl;
mod stats;

pub use commands::{format_config, format_help, handle_config_command, Command, ConfigCommand};
pub use repl::Repl;
pub use stats::SessionStats;
