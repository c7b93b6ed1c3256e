//! # User Errors
//!
//! Error taxonomy for the users resource and its mapping to HTTP replies.

use serde_json::{json, Value};
use thiserror::Error;

use crate::helpers::HelperError;
use crate::record_store::StoreError;

/// Result type for users operations
pub type UserResult<T> = Result<T, UserError>;

/// Users resource errors
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // ==================
    // Validation Errors
    // ==================
    #[error("Missing required fields")]
    MissingRequiredFields,

    #[error("Missing required field")]
    MissingRequiredField,

    #[error("Missing fields to update")]
    MissingFieldsToUpdate,

    #[error("Invalid phone number")]
    InvalidPhone,

    #[error("Method not allowed")]
    MethodNotAllowed,

    // ==================
    // Existence Errors
    // ==================
    #[error("A user with this phone number already exists")]
    AlreadyExists,

    /// Read of an absent user: the normal "no such resource" answer
    #[error("User not found")]
    NotFound,

    #[error("Specified user does not exist")]
    DoesNotExist,

    #[error("Could not find the specified user")]
    CouldNotFind,

    // ==================
    // Internal Errors
    // ==================
    #[error("Could not hash the user's password")]
    HashingFailed(#[source] HelperError),

    #[error("Could not look up the user")]
    LookupFailed(#[source] StoreError),

    #[error("Could not create the new user")]
    CreateFailed(#[source] StoreError),

    #[error("Could not update the user")]
    UpdateFailed(#[source] StoreError),

    #[error("Could not delete the specified user")]
    DeleteFailed(#[source] StoreError),
}

impl UserError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            UserError::MissingRequiredFields
            | UserError::MissingRequiredField
            | UserError::MissingFieldsToUpdate
            | UserError::InvalidPhone
            | UserError::AlreadyExists
            | UserError::DoesNotExist
            | UserError::CouldNotFind => 400,

            UserError::NotFound => 404,

            UserError::MethodNotAllowed => 405,

            UserError::HashingFailed(_)
            | UserError::LookupFailed(_)
            | UserError::CreateFailed(_)
            | UserError::UpdateFailed(_)
            | UserError::DeleteFailed(_) => 500,
        }
    }

    /// Reply body; the cause of internal errors is never included
    pub fn body(&self) -> Option<Value> {
        match self {
            UserError::NotFound | UserError::MethodNotAllowed => None,
            _ => Some(json!({ "Error": self.to_string() })),
        }
    }

    /// Caller mistakes, as opposed to system faults
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
