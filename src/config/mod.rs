//! # Configuration
//!
//! Environment selection (`staging` by default, or `production`) with an
//! optional JSON file overlay.

pub mod environment;
pub mod errors;

pub use environment::{
    AppConfig, ConfigOverrides, Environment, TlsConfig, ENVIRONMENT_VAR, HASHING_SECRET_VAR,
};
pub use errors::{ConfigError, ConfigResult};
