//! CLI module for flatrecord
//!
//! Provides command-line interface for:
//! - serve: Start the HTTP and HTTPS listeners
//! - init: Create the data directory layout

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, ConfigArgs};
pub use commands::{init, prepare_data_dir, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
