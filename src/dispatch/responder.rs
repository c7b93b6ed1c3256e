//! # Single-use Response Completion
//!
//! A handler answers a request by consuming its [`Responder`]. Because
//! `respond` takes `self`, a second completion does not compile.

use axum::http::StatusCode;
use serde_json::{Map, Value};
use tokio::sync::oneshot;

/// Status and body a handler answered with, before coercion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply {
    pub status: Option<u16>,
    pub body: Option<Value>,
}

impl Reply {
    /// Reply with a status and no body
    pub fn status(status: u16) -> Self {
        Self {
            status: Some(status),
            body: None,
        }
    }

    /// Reply with a status and a body
    pub fn with_body(status: u16, body: Value) -> Self {
        Self {
            status: Some(status),
            body: Some(body),
        }
    }

    /// Coerce into a concrete status and serialized body
    ///
    /// A missing or out-of-range status becomes 200 and anything other
    /// than a JSON object becomes `{}`.
    pub fn into_parts(self) -> (StatusCode, String) {
        let status = self
            .status
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::OK);

        let body = match self.body {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        let body = serde_json::to_string(&body).unwrap_or_else(|_| "{}".to_string());

        (status, body)
    }
}

/// One-shot completion handle passed to every handler
#[derive(Debug)]
pub struct Responder {
    tx: oneshot::Sender<Reply>,
}

impl Responder {
    /// Create a responder and the receiver the front end awaits
    pub fn channel() -> (Self, oneshot::Receiver<Reply>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Complete the request with a status and optional body
    pub fn respond(self, status: u16, body: Option<Value>) {
        self.send(Reply {
            status: Some(status),
            body,
        });
    }

    /// Complete the request with a prepared reply
    pub fn send(self, reply: Reply) {
        // The receiver only goes away if the connection was dropped
        if self.tx.send(reply).is_err() {
            tracing::debug!("Response receiver dropped before completion");
        }
    }
}
