//! Per-variable value extraction at a resolved grid cell.

use tracing::{debug, warn};
use weather_common::WeatherVariable;

use crate::config::SourceFields;
use crate::filter::FilteredView;
use crate::source::GridHandle;
use crate::types::{GridPoint, PointValue, SeriesPoint};

/// Kelvin to degrees Celsius offset.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Produce exactly one point per timestep in `view`, in order.
pub fn extract<H: GridHandle + ?Sized>(
    view: &FilteredView<'_, H>,
    point: &GridPoint,
    variable: WeatherVariable,
    fields: &SourceFields,
) -> Vec<SeriesPoint> {
    let columns: Vec<Vec<Option<f64>>> = fields
        .for_variable(variable)
        .into_iter()
        .map(|name| read_field(view, name, point))
        .collect();

    let values = (0..view.len()).map(|step| {
        let row: Option<Vec<f64>> = columns.iter().map(|column| column[step]).collect();
        match (variable, row.as_deref()) {
            (WeatherVariable::Temperature, Some([k])) => PointValue::Scalar(k - KELVIN_OFFSET),
            (WeatherVariable::WindSpeed, Some([u, v])) => PointValue::Vector(*u, *v),
            (WeatherVariable::Precipitation, Some([p])) => PointValue::Scalar(*p),
            _ => PointValue::Missing,
        }
    });

    view.times()
        .iter()
        .zip(values)
        .map(|(t, value)| SeriesPoint {
            timestamp: t.timestamp(),
            value,
        })
        .collect()
}

/// Read one source field over the view; `None` marks an unusable value.
///
/// Tries one series read first. If that fails, reads step by step so a bad
/// step only loses its own value.
fn read_field<H: GridHandle + ?Sized>(
    view: &FilteredView<'_, H>,
    name: &str,
    point: &GridPoint,
) -> Vec<Option<f64>> {
    let handle = view.handle();
    if !handle.has_variable(name) {
        debug!(field = name, "Source field absent from dataset");
        return vec![None; view.len()];
    }

    match handle.read_series(name, view.range(), point.lat_index, point.lon_index) {
        Ok(values) if values.len() == view.len() => values.into_iter().map(usable).collect(),
        Ok(values) => {
            warn!(
                field = name,
                expected = view.len(),
                got = values.len(),
                "Series read returned the wrong length, reading per step"
            );
            read_per_step(view, name, point)
        }
        Err(e) => {
            warn!(field = name, error = %e, "Series read failed, reading per step");
            read_per_step(view, name, point)
        }
    }
}

fn read_per_step<H: GridHandle + ?Sized>(
    view: &FilteredView<'_, H>,
    name: &str,
    point: &GridPoint,
) -> Vec<Option<f64>> {
    let handle = view.handle();
    view.range()
        .map(|t| match handle.read_value(name, t, point.lat_index, point.lon_index) {
            Ok(value) => usable(value),
            Err(e) => {
                debug!(field = name, step = t, error = %e, "Step read failed");
                None
            }
        })
        .collect()
}

fn usable(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter;
    use crate::memory::MemoryGrid;
    use crate::resolve::resolve_nearest;
    use chrono::{Duration, TimeZone, Utc};
    use weather_common::TimeRange;

    fn grid() -> MemoryGrid {
        let t0 = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let times = (0..3).map(|i| t0 + Duration::hours(6 * i)).collect();
        MemoryGrid::new(times, vec![40.0], vec![-74.0])
    }

    fn run(grid: &MemoryGrid, variable: WeatherVariable) -> Vec<SeriesPoint> {
        let window = TimeRange::new(grid.times()[0], grid.times()[2]);
        let view = filter(grid, &window);
        let point = resolve_nearest(grid, 40.0, -74.0).unwrap();
        extract(&view, &point, variable, &SourceFields::default())
    }

    #[test]
    fn test_temperature_conversion_and_screening() {
        let grid = grid()
            .with_field("t2m", vec![300.0, f64::NAN, f64::INFINITY])
            .unwrap();
        let points = run(&grid, WeatherVariable::Temperature);

        assert_eq!(points.len(), 3);
        assert!(matches!(points[0].value, PointValue::Scalar(c) if (c - 26.85).abs() < 1e-9));
        assert!(points[1].value.is_missing());
        assert!(points[2].value.is_missing());
        assert_eq!(points[1].timestamp - points[0].timestamp, 6 * 3_600);
    }

    #[test]
    fn test_wind_needs_both_components() {
        let grid = grid()
            .with_field("u10", vec![1.0, f64::NEG_INFINITY, 3.0])
            .unwrap()
            .with_field("v10", vec![-2.0, 2.0, f64::NAN])
            .unwrap();
        let points = run(&grid, WeatherVariable::WindSpeed);

        assert_eq!(points[0].value, PointValue::Vector(1.0, -2.0));
        assert!(points[1].value.is_missing());
        assert!(points[2].value.is_missing());
    }

    #[test]
    fn test_precipitation_is_identity() {
        let grid = grid().with_field("tp6h", vec![0.0, 0.0012, 0.5]).unwrap();
        let points = run(&grid, WeatherVariable::Precipitation);
        assert_eq!(points[1].value, PointValue::Scalar(0.0012));
    }

    #[test]
    fn test_renamed_source_fields() {
        let grid = grid().with_field("2t", vec![273.15; 3]).unwrap();
        let window = TimeRange::new(grid.times()[0], grid.times()[2]);
        let view = filter(&grid, &window);
        let point = resolve_nearest(&grid, 40.0, -74.0).unwrap();
        let fields = SourceFields {
            temperature: "2t".to_string(),
            ..SourceFields::default()
        };

        let points = extract(&view, &point, WeatherVariable::Temperature, &fields);
        assert!(points.iter().all(|p| p.value == PointValue::Scalar(0.0)));
    }

    #[test]
    fn test_absent_field_gives_all_missing() {
        let grid = grid().with_field("u10", vec![1.0; 3]).unwrap();

        let points = run(&grid, WeatherVariable::WindSpeed);
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|p| p.value.is_missing()));

        let points = run(&grid, WeatherVariable::Temperature);
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|p| p.value.is_missing()));
    }
}
