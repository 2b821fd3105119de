//! Request, result and metadata types for point queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use weather_common::{TimeRange, WeatherVariable};

use crate::format::ValueFormat;
use crate::source::GridHandle;

/// Raw query parameters as received from a caller.
///
/// Every field is optional; [`crate::validate`] decides what is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    /// Window start, seconds since the Unix epoch.
    pub start_time: Option<i64>,
    /// Window end, seconds since the Unix epoch.
    pub end_time: Option<i64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Variable name, e.g. `"temperature"`.
    #[serde(rename = "type")]
    pub variable: Option<String>,
}

impl QueryParams {
    pub fn new(start_time: i64, end_time: i64, lat: f64, lon: f64, variable: &str) -> Self {
        Self {
            start_time: Some(start_time),
            end_time: Some(end_time),
            lat: Some(lat),
            lon: Some(lon),
            variable: Some(variable.to_string()),
        }
    }
}

/// A validated query. Only [`crate::validate`] builds these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryRequest {
    pub window: TimeRange,
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub variable: WeatherVariable,
}

/// One extracted value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointValue {
    /// The timestep exists but the value is missing or not finite.
    Missing,
    Scalar(f64),
    /// Two components, e.g. eastward and northward wind.
    Vector(f64, f64),
}

impl PointValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, PointValue::Missing)
    }

    /// Text form used on the wire; `None` for missing values.
    pub fn render(&self, format: &ValueFormat) -> Option<String> {
        match *self {
            PointValue::Missing => None,
            PointValue::Scalar(v) => Some(format.number(v)),
            PointValue::Vector(u, v) => Some(format!(
                "{}{}{}",
                format.number(u),
                format.delimiter,
                format.number(v)
            )),
        }
    }
}

/// A value at one timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    pub value: PointValue,
}

/// The grid cell a query was answered from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub lat_index: usize,
    pub lon_index: usize,
    pub latitude: f64,
    pub longitude: f64,
}

/// Request echo attached to every result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "type")]
    pub variable: WeatherVariable,
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    pub count: usize,
    /// Coordinates of the grid cell the values come from.
    pub grid_latitude: f64,
    pub grid_longitude: f64,
}

/// Outcome of a successful query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// One point per timestep in the window, chronological.
    pub data: Vec<SeriesPoint>,
    pub metadata: ResultMetadata,
}

impl QueryResult {
    /// Wire representation with values rendered as text.
    pub fn to_response(&self, format: &ValueFormat) -> QueryResponse {
        QueryResponse {
            data: self
                .data
                .iter()
                .map(|p| ResponsePoint {
                    timestamp: p.timestamp,
                    value: p.value.render(format),
                })
                .collect(),
            metadata: self.metadata.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePoint {
    pub timestamp: i64,
    pub value: Option<String>,
}

/// JSON body returned for a successful query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub data: Vec<ResponsePoint>,
    pub metadata: ResultMetadata,
}

/// Sizes of the three grid axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    pub time: usize,
    pub latitude: usize,
    pub longitude: usize,
}

/// Lightweight description of a dataset, cached after first computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    /// First and last valid time; absent for an empty time axis.
    pub time_range: Option<TimeRange>,
    /// `[min, max]`, ignoring NaN entries.
    pub latitude_range: Option<[f64; 2]>,
    pub longitude_range: Option<[f64; 2]>,
    /// Data variables, sorted by name.
    pub variables: Vec<String>,
    pub dimensions: GridDimensions,
}

impl DatasetMetadata {
    pub fn from_handle<H: GridHandle + ?Sized>(handle: &H) -> Self {
        let times = handle.times();
        let mut variables = handle.variable_names();
        variables.sort();

        Self {
            time_range: time_bounds(times),
            latitude_range: bounds(handle.latitudes()),
            longitude_range: bounds(handle.longitudes()),
            variables,
            dimensions: GridDimensions {
                time: times.len(),
                latitude: handle.latitudes().len(),
                longitude: handle.longitudes().len(),
            },
        }
    }
}

fn time_bounds(times: &[DateTime<Utc>]) -> Option<TimeRange> {
    let min = times.iter().min()?;
    let max = times.iter().max()?;
    Some(TimeRange::new(*min, *max))
}

fn bounds(axis: &[f64]) -> Option<[f64; 2]> {
    axis.iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some([v, v]),
            Some([lo, hi]) => Some([lo.min(v), hi.max(v)]),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_values() {
        let format = ValueFormat::default();
        assert_eq!(PointValue::Missing.render(&format), None);
        assert_eq!(
            PointValue::Scalar(300.0 - 273.15).render(&format),
            Some("26.85".to_string())
        );
        assert_eq!(
            PointValue::Vector(3.5, -1.25).render(&format),
            Some("3.5,-1.25".to_string())
        );
    }

    #[test]
    fn test_bounds_skip_nan() {
        assert_eq!(bounds(&[41.0, f64::NAN, 40.0, 40.5]), Some([40.0, 41.0]));
        assert_eq!(bounds(&[f64::NAN]), None);
        assert_eq!(bounds(&[]), None);
    }

    #[test]
    fn test_params_deserialize_type_field() {
        let params: QueryParams = serde_json::from_str(
            r#"{"start_time": 1, "end_time": 2, "lat": 40.0, "lon": -74.0, "type": "temperature"}"#,
        )
        .unwrap();
        assert_eq!(params, QueryParams::new(1, 2, 40.0, -74.0, "temperature"));
    }

    #[test]
    fn test_response_json_shape() {
        let result = QueryResult {
            data: vec![
                SeriesPoint {
                    timestamp: 1_748_736_000,
                    value: PointValue::Scalar(26.85),
                },
                SeriesPoint {
                    timestamp: 1_748_757_600,
                    value: PointValue::Missing,
                },
            ],
            metadata: ResultMetadata {
                latitude: 40.7,
                longitude: -74.0,
                variable: WeatherVariable::Temperature,
                start_timestamp: 1_748_736_000,
                end_timestamp: 1_748_757_600,
                count: 2,
                grid_latitude: 40.75,
                grid_longitude: -74.0,
            },
        };

        let json = serde_json::to_value(result.to_response(&ValueFormat::default())).unwrap();
        assert_eq!(json["data"][0]["value"], "26.85");
        assert!(json["data"][1]["value"].is_null());
        assert_eq!(json["metadata"]["type"], "temperature");
        assert_eq!(json["metadata"]["count"], 2);
    }
}
