//! CLI argument definitions using clap
//!
//! Commands:
//! - flatrecord serve [--env <name>] [--config <path>] [--no-tls]
//! - flatrecord init [--env <name>] [--config <path>]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// flatrecord - a JSON API over file-backed records
#[derive(Parser, Debug)]
#[command(name = "flatrecord")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Environment name (staging or production); defaults to $FLATRECORD_ENV
    #[arg(long)]
    pub env: Option<String>,

    /// Optional JSON file overriding the environment's settings
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP and HTTPS listeners
    Serve {
        #[command(flatten)]
        config: ConfigArgs,

        /// Serve plaintext HTTP only
        #[arg(long)]
        no_tls: bool,
    },

    /// Create the data directory layout and exit
    Init {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
