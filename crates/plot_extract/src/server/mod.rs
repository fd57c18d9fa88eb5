//! REST surface driving the extraction session
//!
//! - `POST /upload/`: multipart upload of a layout sheet, runs extraction
//! - `GET /plots/`: records of the most recent successful run
//! - `GET /plots/geojson`: the same records as GeoJSON
//! - `GET /health`

mod handlers;
mod types;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::session::ExtractionSession;

pub use handlers::*;
pub use types::*;

/// Scanned sheets are routinely larger than axum's 2 MiB default
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// API server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<ExtractionSession>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(session: Arc<ExtractionSession>) -> Self {
        Self {
            session,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(ExtractionSession::new()))
    }
}

/// Build the API router with all endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/upload/", post(upload_layout))
        .route("/plots/", get(get_plots))
        .route("/plots/geojson", get(get_plots_geojson))
        // Middleware
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the API server
pub async fn start_server(addr: &str, state: AppState) -> Result<(), std::io::Error> {
    tracing::info!("Starting plot extraction server on {}", addr);

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await
}
