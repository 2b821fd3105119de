//! Request validation. Pure; never touches the dataset.

use weather_common::time::from_epoch_seconds;
use weather_common::{TimeRange, WeatherVariable};

use crate::error::Rejection;
use crate::types::{QueryParams, QueryRequest};

/// Check `params` and build a [`QueryRequest`].
///
/// Checks run in a fixed order and stop at the first failure: presence,
/// variable name, window order, timestamp range, coordinate bounds.
pub fn validate(params: &QueryParams) -> Result<QueryRequest, Rejection> {
    let (Some(start), Some(end), Some(lat), Some(lon), Some(name)) = (
        params.start_time,
        params.end_time,
        params.lat,
        params.lon,
        params.variable.as_deref(),
    ) else {
        return Err(Rejection::MissingParameters);
    };

    let variable: WeatherVariable = name.parse().map_err(|_| Rejection::InvalidType)?;

    if start >= end {
        return Err(Rejection::StartNotBeforeEnd);
    }

    let (Some(start_dt), Some(end_dt)) = (from_epoch_seconds(start), from_epoch_seconds(end))
    else {
        return Err(Rejection::InvalidTimestamp);
    };

    // Range checks are false for NaN, so NaN is rejected too.
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(Rejection::InvalidCoordinates);
    }

    Ok(QueryRequest {
        window: TimeRange::new(start_dt, end_dt),
        start_timestamp: start,
        end_timestamp: end,
        latitude: lat,
        longitude: lon,
        variable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: i64 = 1_748_736_000;
    const END: i64 = 1_748_757_600;

    #[test]
    fn test_valid_request() {
        let req = validate(&QueryParams::new(START, END, 40.7, -74.0, "wind_speed")).unwrap();
        assert_eq!(req.variable, WeatherVariable::WindSpeed);
        assert_eq!(req.window.start.timestamp(), START);
        assert_eq!(req.window.end.timestamp(), END);
    }

    #[test]
    fn test_missing_fields() {
        let mut params = QueryParams::new(START, END, 40.7, -74.0, "temperature");
        params.lon = None;
        assert_eq!(validate(&params), Err(Rejection::MissingParameters));
        assert_eq!(validate(&QueryParams::default()), Err(Rejection::MissingParameters));
    }

    #[test]
    fn test_missing_wins_over_other_failures() {
        let params = QueryParams {
            start_time: Some(END),
            end_time: Some(START),
            lat: Some(500.0),
            lon: None,
            variable: Some("humidity".into()),
        };
        assert_eq!(validate(&params), Err(Rejection::MissingParameters));
    }

    #[test]
    fn test_unknown_type_checked_before_window() {
        let params = QueryParams::new(END, START, 40.7, -74.0, "humidity");
        assert_eq!(validate(&params), Err(Rejection::InvalidType));
    }

    #[test]
    fn test_window_order() {
        let equal = QueryParams::new(START, START, 40.7, -74.0, "temperature");
        assert_eq!(validate(&equal), Err(Rejection::StartNotBeforeEnd));

        // Window checked before coordinates
        let reversed = QueryParams::new(END, START, 95.0, -74.0, "temperature");
        assert_eq!(validate(&reversed), Err(Rejection::StartNotBeforeEnd));
    }

    #[test]
    fn test_unrepresentable_timestamp() {
        let params = QueryParams::new(START, i64::MAX, 40.7, -74.0, "temperature");
        assert_eq!(validate(&params), Err(Rejection::InvalidTimestamp));
    }

    #[test]
    fn test_coordinate_bounds() {
        for (lat, lon) in [(90.0, 180.0), (-90.0, -180.0), (0.0, 0.0)] {
            assert!(validate(&QueryParams::new(START, END, lat, lon, "precipitation")).is_ok());
        }
        for (lat, lon) in [
            (90.1, 0.0),
            (-90.1, 0.0),
            (0.0, 180.5),
            (0.0, -181.0),
            (f64::NAN, 0.0),
            (0.0, f64::NAN),
            (f64::INFINITY, 0.0),
        ] {
            assert_eq!(
                validate(&QueryParams::new(START, END, lat, lon, "precipitation")),
                Err(Rejection::InvalidCoordinates),
                "lat={lat} lon={lon}"
            );
        }
    }
}
