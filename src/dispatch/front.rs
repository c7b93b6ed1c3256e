//! # Dispatch Front End
//!
//! Shared by the plaintext and TLS listeners. One strictly sequential pass
//! per request: buffer the body, build the descriptor, resolve the route,
//! run the handler, then write the coerced reply in one shot.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::Instrument;

use super::request::RequestDescriptor;
use super::responder::{Reply, Responder};
use super::router::RouteTable;
use crate::helpers::create_random_string;

const REQUEST_ID_LENGTH: usize = 20;

/// Run one request through the route table and return its reply
///
/// Always produces exactly one reply: a handler that drops its responder
/// without answering yields a 500.
pub async fn dispatch(routes: &RouteTable, request: RequestDescriptor) -> Reply {
    let handler = routes.resolve(request.trimmed_path());
    let (responder, completion) = Responder::channel();

    handler.handle(request, responder).await;

    completion.await.unwrap_or_else(|_| {
        tracing::error!("Handler finished without responding");
        Reply::with_body(500, json!({ "Error": "Internal server error" }))
    })
}

/// Axum entry point: every path and method lands here
///
/// The `Bytes` extractor has already buffered the whole body, so handlers
/// never see partial input. A body that could not be buffered (over the
/// configured limit, or a broken stream) is answered here, still as JSON.
pub async fn dispatch_http(
    State(routes): State<Arc<RouteTable>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(
                method = %method,
                path = %uri.path(),
                error = %rejection.body_text(),
                "Could not buffer the request body"
            );
            let reply = Reply::with_body(
                rejection.status().as_u16(),
                json!({ "Error": rejection.body_text() }),
            );
            return write_reply(reply);
        }
    };

    let request = RequestDescriptor::from_http(&method, &uri, &headers, &body);
    let request_id = create_random_string(REQUEST_ID_LENGTH).unwrap_or_default();
    let span = tracing::info_span!(
        "request",
        id = %request_id,
        method = %request.method(),
        path = %request.trimmed_path(),
    );

    async move { write_reply(dispatch(&routes, request).await) }
        .instrument(span)
        .await
}

fn write_reply(reply: Reply) -> Response {
    let (status, payload) = reply.into_parts();

    tracing::info!(status = status.as_u16(), payload = %payload, "Returning this response");

    (status, [(header::CONTENT_TYPE, "application/json")], payload).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::handler::{Handler, PingHandler};
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct SilentHandler;

    #[async_trait]
    impl Handler for SilentHandler {
        async fn handle(&self, _request: RequestDescriptor, respond: Responder) {
            drop(respond);
        }
    }

    struct EchoHandler;

    #[async_trait]
    impl Handler for EchoHandler {
        async fn handle(&self, request: RequestDescriptor, respond: Responder) {
            respond.respond(
                202,
                Some(json!({ "method": request.method(), "payload": request.payload() })),
            );
        }
    }

    fn request(method: &str, path: &str) -> RequestDescriptor {
        RequestDescriptor::new(method, path, None, HashMap::new(), "body")
    }

    fn table() -> RouteTable {
        RouteTable::builder()
            .route("ping", PingHandler)
            .route("echo", EchoHandler)
            .route("silent", SilentHandler)
            .build()
    }

    #[tokio::test]
    async fn test_routes_by_trimmed_path() {
        let reply = dispatch(&table(), request("GET", "/ping/")).await;
        assert_eq!(reply, Reply::status(200));
    }

    #[tokio::test]
    async fn test_unmatched_path_is_not_found() {
        let reply = dispatch(&table(), request("POST", "/does-not-exist")).await;
        assert_eq!(reply, Reply::status(404));
    }

    #[tokio::test]
    async fn test_handler_sees_descriptor() {
        let reply = dispatch(&table(), request("PUT", "echo")).await;
        assert_eq!(
            reply,
            Reply::with_body(202, json!({ "method": "put", "payload": "body" }))
        );
    }

    #[tokio::test]
    async fn test_silent_handler_still_gets_a_response() {
        let reply = dispatch(&table(), request("GET", "silent")).await;
        assert_eq!(reply.status, Some(500));
    }
}
