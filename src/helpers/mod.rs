//! # Helpers
//!
//! Pure functions shared by resource handlers: field validation, keyed
//! secret hashing, lenient JSON decoding and random tokens.

pub mod crypto;
pub mod errors;
pub mod json;
pub mod validate;

pub use crypto::{create_random_string, SecretHasher};
pub use errors::{HelperError, HelperResult};
pub use json::parse_json_to_object;
pub use validate::{require_true, TextField};
