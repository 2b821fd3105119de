//! Point/time query handler.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    response::{IntoResponse, Response},
    Json,
};
use grid_query::QueryParams;
use metrics::counter;
use tracing::error;
use weather_common::WeatherError;

use super::error_response;
use crate::state::AppState;

/// GET /api/weather?start_time=&end_time=&lat=&lon=&type=
pub async fn weather_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(raw): Query<HashMap<String, String>>,
) -> Response {
    counter!("weather_http_requests_total", "endpoint" => "weather").increment(1);
    let params = parse_params(&raw);

    let worker = Arc::clone(&state);
    let outcome = tokio::task::spawn_blocking(move || worker.engine.query(&params)).await;

    match outcome {
        Ok(Ok(result)) => Json(result.to_response(state.engine.value_format())).into_response(),
        Ok(Err(e)) => error_response(&WeatherError::from(e)),
        Err(e) => {
            error!(error = %e, "Query task did not complete");
            error_response(&WeatherError::InternalError(e.to_string()))
        }
    }
}

/// Build query parameters from the raw query string.
///
/// A value that is present but empty or unparsable counts as absent.
pub fn parse_params(raw: &HashMap<String, String>) -> QueryParams {
    QueryParams {
        start_time: parsed(raw, "start_time"),
        end_time: parsed(raw, "end_time"),
        lat: parsed(raw, "lat"),
        lon: parsed(raw, "lon"),
        variable: raw.get("type").filter(|v| !v.is_empty()).cloned(),
    }
}

fn parsed<T: FromStr>(raw: &HashMap<String, String>, key: &str) -> Option<T> {
    raw.get(key).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_all_params() {
        let params = parse_params(&raw(&[
            ("start_time", "1748736000"),
            ("end_time", "1748822400"),
            ("lat", "40.7"),
            ("lon", "-74.0"),
            ("type", "temperature"),
        ]));
        assert_eq!(
            params,
            QueryParams::new(1_748_736_000, 1_748_822_400, 40.7, -74.0, "temperature")
        );
    }

    #[test]
    fn test_unparsable_values_are_absent() {
        let params = parse_params(&raw(&[
            ("start_time", "yesterday"),
            ("end_time", "1.5"),
            ("lat", ""),
            ("lon", "-74.0"),
            ("type", ""),
        ]));
        assert_eq!(params.start_time, None);
        assert_eq!(params.end_time, None);
        assert_eq!(params.lat, None);
        assert_eq!(params.lon, Some(-74.0));
        assert_eq!(params.variable, None);
    }
}
