//! HTTP request handlers for API endpoints

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{error, info, warn};

use crate::{
    server::{AppState, HealthResponse, UploadResponse},
    types::{ExtractionResult, PlotBoundaryRecord},
};

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Run extraction on an uploaded layout sheet and replace the current result.
///
/// The image is taken from the `file` part, or the first part carrying a
/// file name. A decode failure answers 422 and leaves the stored result alone.
pub async fn upload_layout(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> (StatusCode, Json<UploadResponse>) {
    let mut image_bytes = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let is_file = field.name() == Some("file") || field.file_name().is_some();
                if !is_file {
                    continue;
                }
                info!(file_name = ?field.file_name(), "Receiving layout upload");
                match field.bytes().await {
                    Ok(bytes) => {
                        image_bytes = Some(bytes);
                        break;
                    }
                    Err(e) => {
                        warn!("Failed to read upload body: {}", e);
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(UploadResponse::error(format!("Failed to read upload: {e}"))),
                        );
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!("Malformed multipart request: {}", e);
                return (
                    StatusCode::BAD_REQUEST,
                    Json(UploadResponse::error(format!("Malformed multipart request: {e}"))),
                );
            }
        }
    }

    let Some(bytes) = image_bytes else {
        return (
            StatusCode::BAD_REQUEST,
            Json(UploadResponse::error("No file part in upload")),
        );
    };

    // Extraction is CPU bound; keep it off the async workers
    let session = state.session.clone();
    let outcome = tokio::task::spawn_blocking(move || session.run(&bytes)).await;

    match outcome {
        Ok(Ok(result)) => (StatusCode::OK, Json(UploadResponse::success(result.len()))),
        Ok(Err(e)) if e.is_decode() => {
            warn!("Rejected upload: {}", e);
            (StatusCode::UNPROCESSABLE_ENTITY, Json(UploadResponse::error(e.to_string())))
        }
        Ok(Err(e)) => {
            error!("Extraction failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(UploadResponse::error(e.to_string())))
        }
        Err(e) => {
            error!("Extraction task panicked: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(UploadResponse::error("Extraction task failed")),
            )
        }
    }
}

/// Records of the current result, `[]` before the first successful upload
pub async fn get_plots(State(state): State<AppState>) -> Json<Vec<PlotBoundaryRecord>> {
    Json(state.session.records())
}

/// Current result as a GeoJSON FeatureCollection
pub async fn get_plots_geojson(State(state): State<AppState>) -> Json<geojson::FeatureCollection> {
    let collection = match state.session.current() {
        Some(result) => result.to_geojson(),
        None => ExtractionResult::default().to_geojson(),
    };
    Json(collection)
}
