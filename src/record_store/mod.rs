//! # Record Store
//!
//! Durable storage of flat JSON documents, one file per record,
//! addressed by (collection, id).
//!
//! `create` is the only exclusivity-checked entry point. `update` and
//! `delete` expect the caller to have confirmed existence first; the store
//! does not serialize concurrent calls.

pub mod errors;
pub mod store;

pub use errors::{StoreError, StoreResult};
pub use store::RecordStore;
