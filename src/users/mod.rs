//! # Users Resource
//!
//! User lifecycle over the record store: field validation, one-way
//! password hashing and redaction of the stored digest on read.
//!
//! There is no authentication: any caller may read, update or delete a
//! user by phone number.

pub mod errors;
pub mod handler;
pub mod model;

pub use errors::{UserError, UserResult};
pub use handler::{UserMethod, UsersHandler};
pub use model::{NewUser, USERS_COLLECTION};
