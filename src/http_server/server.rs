//! # HTTP Server
//!
//! Binds the plaintext and TLS listeners to one router. Every request,
//! whatever the transport, goes through the same dispatch front end.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, TlsConfig};
use crate::dispatch::{dispatch_http, PingHandler, RouteTable};
use crate::helpers::SecretHasher;
use crate::record_store::RecordStore;
use crate::users::UsersHandler;

/// Build the route table: `ping` and `users`, everything else is 404
pub fn route_table(store: RecordStore, hasher: SecretHasher, phone_length: usize) -> RouteTable {
    RouteTable::builder()
        .route("ping", PingHandler)
        .route("users", UsersHandler::new(store, hasher, phone_length))
        .build()
}

/// Wrap a route table in an axum router that sends every request to it
///
/// With no `max_body_bytes` the whole body is always buffered; with a limit,
/// oversized bodies are refused by the front end with a JSON reply.
pub fn build_router(routes: Arc<RouteTable>, max_body_bytes: Option<usize>) -> Router {
    let body_limit = match max_body_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .fallback(dispatch_http)
        .with_state(routes)
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
}

/// HTTP(S) server for the record API
pub struct HttpServer {
    config: AppConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server for a resolved configuration
    pub fn new(config: AppConfig) -> Self {
        let routes = route_table(
            RecordStore::new(&config.data_dir),
            SecretHasher::new(config.hashing_secret.as_bytes()),
            config.phone_length,
        );
        tracing::debug!(?routes, "Route table built");

        let router = build_router(Arc::new(routes), config.max_body_bytes);
        Self { config, router }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the router (for testing)
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until a listener fails
    pub async fn start(self) -> io::Result<()> {
        let http = serve_http(self.config.http_addr(), self.router.clone());

        match &self.config.tls {
            Some(tls) => {
                let https = serve_https(self.config.https_addr(), tls, self.router.clone());
                tokio::try_join!(http, https)?;
            }
            None => http.await?,
        }

        Ok(())
    }
}

async fn serve_http(addr: String, router: Router) -> io::Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "The server is listening (http)");

    axum::serve(listener, router).await
}

async fn serve_https(addr: String, tls: &TlsConfig, router: Router) -> io::Result<()> {
    let socket_addr: SocketAddr = addr.parse().map_err(|e| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("Invalid address {addr}: {e}"))
    })?;

    let rustls = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
        .await
        .map_err(|e| {
            io::Error::new(
                e.kind(),
                format!(
                    "Could not load TLS certificate {} / key {}: {e}",
                    tls.cert_path.display(),
                    tls.key_path.display()
                ),
            )
        })?;
    tracing::info!(addr = %socket_addr, "The server is listening (https)");

    axum_server::bind_rustls(socket_addr, rustls)
        .serve(router.into_make_service())
        .await
}
