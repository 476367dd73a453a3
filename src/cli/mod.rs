//! Command-line interface for doizer.

mod commands;

pub use commands::{Cli, run_command};
