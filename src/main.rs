//! flatrecord entry point
//!
//! Parses arguments and delegates to the CLI module. Errors are printed to
//! stderr and the process exits non-zero.

use flatrecord::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
