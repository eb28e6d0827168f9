//! Advisory HTTP server.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;
use crate::domain::models::ServerConfig;

/// Largest accepted leaf image upload.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Build the router with every advisory route.
pub fn build_router(state: Arc<AppState>, enable_cors: bool) -> Router {
    let app = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/satellite", post(handlers::satellite))
        .route("/satellite/", post(handlers::satellite))
        .route("/recommendations", post(handlers::recommendations))
        .route("/recommendations/", post(handlers::recommendations))
        .route("/market", post(handlers::market))
        .route("/market/", post(handlers::market))
        .route("/disease", post(handlers::disease))
        .route("/disease/", post(handlers::disease))
        .route("/chat", post(handlers::chat))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state);

    if enable_cors {
        app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
            .layer(TraceLayer::new_for_http())
    } else {
        app.layer(TraceLayer::new_for_http())
    }
}

pub struct ApiServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    pub fn new(state: Arc<AppState>, config: ServerConfig) -> Self {
        Self { config, state }
    }

    fn addr(&self) -> Result<SocketAddr, Box<dyn std::error::Error + Send + Sync>> {
        Ok(format!("{}:{}", self.config.host, self.config.port).parse()?)
    }

    /// Start the server.
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(
        self,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = self.addr()?;
        let router = build_router(self.state, self.config.enable_cors);

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "advisory API listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}
