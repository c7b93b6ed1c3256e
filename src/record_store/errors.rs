//! # Record Store Errors

use thiserror::Error;

/// Result type for record store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Record store errors
///
/// `NotFound` is an expected outcome used by callers to answer
/// "does this record exist"; everything below it is a real failure.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Record already exists: {collection}/{id}")]
    AlreadyExists { collection: String, id: String },

    #[error("Record not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("Invalid record key: {0}")]
    InvalidKey(String),

    #[error("Could not serialize record: {0}")]
    Serialize(String),

    #[error("Error writing record: {0}")]
    Write(String),

    #[error("Error reading record: {0}")]
    Read(String),

    #[error("Error deleting record: {0}")]
    Delete(String),
}

impl StoreError {
    pub(crate) fn already_exists(collection: &str, id: &str) -> Self {
        StoreError::AlreadyExists {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub(crate) fn not_found(collection: &str, id: &str) -> Self {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    /// Whether the record simply does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Whether the record already existed on create
    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists { .. })
    }
}
