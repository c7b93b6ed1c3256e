//! # Helper Errors

use thiserror::Error;

/// Result type for helper operations
pub type HelperResult<T> = Result<T, HelperError>;

/// Failures of the hashing helpers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HelperError {
    /// Nothing to hash
    #[error("Cannot hash an empty value")]
    EmptyInput,

    /// Only text can be hashed
    #[error("Cannot hash a non-text value")]
    NotText,

    /// The configured key was rejected by the MAC
    #[error("Internal error: hashing key rejected")]
    InvalidKey,
}
