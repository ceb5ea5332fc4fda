//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the relay handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Bind server to listener
//! - Stop accepting and drain on shutdown

use axum::{
    body::Body,
    http::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::backend::{BackendClient, BackendError};
use crate::config::RelayConfig;
use crate::http::handlers::{fetch_canvas, health, submit_draw};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestId};

/// Inbound route relaying the backend grid, as requested by the canvas page.
pub const GRID_ROUTE: &str = "/grid";
/// Alias of [`GRID_ROUTE`].
pub const CANVAS_ROUTE: &str = "/canvas";
/// Inbound route accepting draw forms.
pub const DRAW_ROUTE: &str = "/draw";
/// Liveness route.
pub const HEALTH_ROUTE: &str = "/healthz";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<BackendClient>,
}

/// HTTP server for the canvas relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, BackendError> {
        let backend = BackendClient::new(&config.backend, &config.timeouts)?;
        let state = AppState {
            backend: Arc::new(backend),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = RequestId::from_headers(request.headers());
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id,
                )
            }))
            .layer(propagate_request_id_layer())
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.inbound_secs)));

        Router::new()
            .route(GRID_ROUTE, get(fetch_canvas))
            .route(CANVAS_ROUTE, get(fetch_canvas))
            .route(DRAW_ROUTE, post(submit_draw))
            .route(HEALTH_ROUTE, get(health))
            .with_state(state)
            .layer(middleware)
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend = %self.config.backend.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}
