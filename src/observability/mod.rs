//! # Observability
//!
//! Logging is done with `tracing` throughout the crate; this module only
//! installs the subscriber at process start.

mod logging;

pub use logging::{filter_directives, init_logging, LogFormat};
