//! # Handler Contract
//!
//! Every route handler has the same shape: a request descriptor in, a
//! single-use responder to complete. Handlers never touch the transport.

use async_trait::async_trait;

use super::request::RequestDescriptor;
use super::responder::Responder;

/// A route handler
#[async_trait]
pub trait Handler: Send + Sync {
    /// Handle one request and complete it through `respond`
    async fn handle(&self, request: RequestDescriptor, respond: Responder);
}

/// Liveness check, always 200 with an empty body
#[derive(Debug, Default, Clone, Copy)]
pub struct PingHandler;

#[async_trait]
impl Handler for PingHandler {
    async fn handle(&self, _request: RequestDescriptor, respond: Responder) {
        respond.respond(200, None);
    }
}

/// Fallback for unrouted paths, always 404 with an empty body
#[derive(Debug, Default, Clone, Copy)]
pub struct NotFoundHandler;

#[async_trait]
impl Handler for NotFoundHandler {
    async fn handle(&self, _request: RequestDescriptor, respond: Responder) {
        respond.respond(404, None);
    }
}
