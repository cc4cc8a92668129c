//! HTTP API for the verification service

pub mod error;
pub mod routes;
pub mod types;

pub use error::ApiError;

use crate::config::ServerConfig;
use crate::pipeline::VerificationPipeline;
use crate::recorder::BlockchainRecorder;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Multipart framing allowance on top of the upload limit
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Shared state injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<VerificationPipeline>,
    pub recorder: Arc<dyn BlockchainRecorder>,
    pub server: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(
        pipeline: Arc<VerificationPipeline>,
        recorder: Arc<dyn BlockchainRecorder>,
        server: ServerConfig,
    ) -> Self {
        Self {
            pipeline,
            recorder,
            server: Arc::new(server),
        }
    }
}

/// Build the service router
pub fn router(state: AppState) -> Router {
    let body_limit = state.server.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/api/health", get(routes::health))
        .route("/verify", post(routes::verify_text))
        .route("/api/verify-text", post(routes::verify_text))
        .route("/api/verify", post(routes::verify_file))
        .route("/verify/history", get(routes::history))
        .route("/api/verify/history", get(routes::history))
        .route("/verify/history/:id", get(routes::history_item))
        .route("/api/verify/history/:id", get(routes::history_item))
        .route("/api/blockchain/status", get(routes::blockchain_status))
        .route("/api/blockchain/records/:hash", get(routes::blockchain_record))
        .fallback(routes::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::map_response(routes::json_method_not_allowed))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
