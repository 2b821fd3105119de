//! HTTP request handlers for the weather API.

pub mod health;
pub mod metadata;
pub mod weather;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use weather_common::WeatherError;

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map an error to its status code and public message.
pub fn error_response(err: &WeatherError) -> Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ErrorResponse {
        error: err.public_message(),
    };
    (status, Json(body)).into_response()
}

/// Fallback for unknown routes.
pub async fn not_found_handler() -> Response {
    let body = ErrorResponse {
        error: "Endpoint not found".to_string(),
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}
