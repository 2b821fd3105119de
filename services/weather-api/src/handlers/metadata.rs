//! Dataset metadata handler.

use std::sync::Arc;

use axum::{
    extract::Extension,
    response::{IntoResponse, Response},
    Json,
};
use metrics::counter;
use tracing::error;
use weather_common::WeatherError;

use super::error_response;
use crate::state::AppState;

/// GET /api/metadata - Cached coverage, variables and grid sizes
pub async fn metadata_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    counter!("weather_http_requests_total", "endpoint" => "metadata").increment(1);

    // Served straight from the cache once computed.
    if let Some(metadata) = state.engine.manager().cached_metadata() {
        return Json(metadata.clone()).into_response();
    }

    let worker = Arc::clone(&state);
    let outcome =
        tokio::task::spawn_blocking(move || worker.engine.metadata().map(Clone::clone)).await;

    match outcome {
        Ok(Ok(metadata)) => Json(metadata).into_response(),
        Ok(Err(e)) => {
            error!(error = %e, "Dataset metadata unavailable");
            error_response(&WeatherError::from(e))
        }
        Err(e) => {
            error!(error = %e, "Metadata task did not complete");
            error_response(&WeatherError::InternalError(e.to_string()))
        }
    }
}
