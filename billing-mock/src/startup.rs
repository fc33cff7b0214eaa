//! Application startup and lifecycle management.

use crate::config::MockConfig;
use crate::handlers::{admin, health_check, metrics_handler, readiness_check, vendor_call};
use crate::services::{init_metrics, Store, Synthesizer};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::metrics::metrics_middleware;
use service_core::middleware::tracing::request_id_middleware;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: MockConfig,
    pub store: Arc<Store>,
    pub synth: Synthesizer,
}

/// Build the HTTP router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/core", post(vendor_call))
        .route("/admin", post(vendor_call))
        .route("/mock/reset", post(admin::reset))
        .route("/mock/stats", get(admin::stats))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    http_listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: MockConfig) -> Result<Self, AppError> {
        init_metrics();

        let state = AppState {
            config: config.clone(),
            store: Arc::new(Store::new()),
            synth: Synthesizer::new(config.response_mode),
        };

        let http_addr = config.common.bind_addr();
        let http_listener = TcpListener::bind(http_addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %http_addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let http_port = http_listener.local_addr()?.port();

        tracing::info!(
            http_port = http_port,
            response_mode = %config.response_mode,
            "Billing mock listener bound"
        );

        Ok(Self {
            http_port,
            http_listener,
            state,
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    /// Handle to the entity store, for harnesses that seed or inspect it.
    pub fn store(&self) -> Arc<Store> {
        self.state.store.clone()
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let service_name = self.state.config.service_name.clone();
        let app = router(self.state);

        tracing::info!(
            service = %service_name,
            version = env!("CARGO_PKG_VERSION"),
            http_port = self.http_port,
            "Service ready to accept connections"
        );

        axum::serve(self.http_listener, app).await.map_err(|e| {
            tracing::error!(error = %e, "HTTP server error");
            std::io::Error::other(format!("HTTP server error: {}", e))
        })
    }
}
