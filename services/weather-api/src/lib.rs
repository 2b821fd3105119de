//! Weather API Service Library
//!
//! HTTP surface over the point/time query engine:
//!
//! - `GET /api/weather` runs one query
//! - `GET /api/metadata` describes the dataset
//! - `GET /api/health` and `GET /metrics` for operations

pub mod config;
pub mod handlers;
pub mod state;

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the router with all routes and middleware.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/weather", get(handlers::weather::weather_handler))
        .route("/api/metadata", get(handlers::metadata::metadata_handler))
        .route("/api/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        .fallback(handlers::not_found_handler)
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
