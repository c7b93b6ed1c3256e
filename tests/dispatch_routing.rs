//! Dispatch Front End Tests
//!
//! Routing, path normalization and reply coercion through the real axum
//! router.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use flatrecord::dispatch::{Handler, PingHandler, RequestDescriptor, Responder, RouteTable};
use flatrecord::helpers::SecretHasher;
use flatrecord::http_server::{build_router, route_table};
use flatrecord::record_store::RecordStore;
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt;

/// Answers with a non-object body to exercise coercion
struct ListHandler;

#[async_trait]
impl Handler for ListHandler {
    async fn handle(&self, _request: RequestDescriptor, respond: Responder) {
        respond.respond(201, Some(json!(["not", "an", "object"])));
    }
}

/// Echoes the descriptor it was given
struct EchoHandler;

#[async_trait]
impl Handler for EchoHandler {
    async fn handle(&self, request: RequestDescriptor, respond: Responder) {
        respond.respond(
            200,
            Some(json!({
                "path": request.trimmed_path(),
                "method": request.method(),
                "query": request.query(),
                "agent": request.headers().get("user-agent"),
                "payload": request.payload(),
            })),
        );
    }
}

async fn call(app: Router, method: Method, uri: &str, body: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("User-Agent", "tests")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn test_app() -> Router {
    let routes = RouteTable::builder()
        .route("ping", PingHandler)
        .route("list", ListHandler)
        .route("api/echo", EchoHandler)
        .build();
    build_router(Arc::new(routes), None)
}

#[tokio::test]
async fn test_ping_is_ok_with_empty_body() {
    for method in [Method::GET, Method::POST, Method::DELETE] {
        let (status, body) = call(test_app(), method, "/ping", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "{}");
    }
}

#[tokio::test]
async fn test_unrouted_path_is_not_found() {
    for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE] {
        let (status, body) = call(test_app(), method, "/does-not-exist", "{\"a\":1}").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "{}");
    }
}

#[tokio::test]
async fn test_unrouted_path_never_touches_storage() {
    let dir = TempDir::new().unwrap();
    let app = build_router(
        Arc::new(route_table(
            RecordStore::new(dir.path()),
            SecretHasher::new("k"),
            10,
        )),
        None,
    );

    let (status, _) = call(app, Method::POST, "/does-not-exist", "{}").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_large_body_is_buffered_and_dispatched() {
    let large = "x".repeat(3 * 1024 * 1024);

    let (status, body) = call(test_app(), Method::POST, "/does-not-exist", &large).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "{}");

    let (status, body) = call(test_app(), Method::GET, "/ping", &large).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "{}");
}

#[tokio::test]
async fn test_body_over_configured_limit_gets_json_reply() {
    let routes = RouteTable::builder().route("ping", PingHandler).build();
    let app = build_router(Arc::new(routes), Some(1024));

    let oversized = "x".repeat(2048);

    let (status, body) = call(app.clone(), Method::POST, "/does-not-exist", &oversized).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(body["Error"].is_string());

    let (status, body) = call(app, Method::POST, "/does-not-exist", "{}").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "{}");
}

#[tokio::test]
async fn test_non_object_body_is_coerced() {
    let (status, body) = call(test_app(), Method::GET, "/list", "").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, "{}");
}

#[tokio::test]
async fn test_descriptor_is_normalized() {
    let (status, body) = call(
        test_app(),
        Method::PUT,
        "/api/echo/?k=1&k=2&x=y",
        "raw body",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        body,
        json!({
            "path": "api/echo",
            "method": "put",
            "query": {"k": "2", "x": "y"},
            "agent": "tests",
            "payload": "raw body",
        })
    );
}
