//! # HTTP Server Module
//!
//! Transport for the record API: a plaintext listener and an optional
//! rustls listener sharing one router.
//!
//! # Endpoints
//!
//! - `/ping` - Liveness check
//! - `/users` - User create (POST), read (GET), update (PUT), delete (DELETE)
//! - anything else - 404

pub mod server;

pub use server::{build_router, route_table, HttpServer};
