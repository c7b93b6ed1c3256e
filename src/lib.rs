//! flatrecord - a minimal JSON API over file-backed records
//!
//! Request pipeline: listener, request descriptor, route lookup, handler,
//! single-use response. Records live one JSON file per record on disk.

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod helpers;
pub mod http_server;
pub mod observability;
pub mod record_store;
pub mod users;
