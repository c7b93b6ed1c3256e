//! # User Record
//!
//! Users are stored in the `users` collection keyed by phone number.

use serde::Serialize;
use serde_json::{Map, Value};

/// Collection holding user records
pub const USERS_COLLECTION: &str = "users";

pub const FIRST_NAME_FIELD: &str = "firstName";
pub const LAST_NAME_FIELD: &str = "lastName";
pub const PHONE_FIELD: &str = "phone";
pub const PASSWORD_FIELD: &str = "password";
pub const TOS_AGREEMENT_FIELD: &str = "tosAgreement";
pub const HASHED_PASSWORD_FIELD: &str = "hashedPassword";

/// Shape of a freshly created user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    /// Keyed digest, never the original password
    pub hashed_password: String,
    pub tos_agreement: bool,
}

/// Remove the password digest from a stored document before it is sent out
pub fn redact(mut document: Map<String, Value>) -> Map<String, Value> {
    document.remove(HASHED_PASSWORD_FIELD);
    document
}
