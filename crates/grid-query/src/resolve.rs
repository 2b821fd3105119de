//! Nearest-neighbour resolution of a location to a grid cell.

use crate::error::{QueryError, Result};
use crate::source::GridHandle;
use crate::types::GridPoint;

/// Index of the entry closest to `target`.
///
/// Ties go to the first index; NaN entries are never chosen. Works for
/// ascending, descending and unsorted axes.
pub fn nearest_index(axis: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &value) in axis.iter().enumerate() {
        let distance = (value - target).abs();
        if distance.is_nan() {
            continue;
        }
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((i, distance)),
        }
    }
    best.map(|(i, _)| i)
}

/// Resolve `(lat, lon)` to the nearest grid cell, each axis independently.
pub fn resolve_nearest<H: GridHandle + ?Sized>(
    handle: &H,
    lat: f64,
    lon: f64,
) -> Result<GridPoint> {
    let latitudes = handle.latitudes();
    let longitudes = handle.longitudes();

    let lat_index = nearest_index(latitudes, lat)
        .ok_or_else(|| QueryError::unavailable("latitude axis has no usable values"))?;
    let lon_index = nearest_index(longitudes, lon)
        .ok_or_else(|| QueryError::unavailable("longitude axis has no usable values"))?;

    Ok(GridPoint {
        lat_index,
        lon_index,
        latitude: latitudes[lat_index],
        longitude: longitudes[lon_index],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascending_and_descending() {
        assert_eq!(nearest_index(&[40.0, 40.25, 40.5, 40.75], 40.6), Some(2));
        assert_eq!(nearest_index(&[41.0, 40.75, 40.5, 40.25], 40.7), Some(1));
    }

    #[test]
    fn test_unsorted() {
        assert_eq!(nearest_index(&[10.0, -3.0, 7.0, 2.0], 1.0), Some(3));
    }

    #[test]
    fn test_ties_go_to_first_index() {
        assert_eq!(nearest_index(&[40.0, 40.5], 40.25), Some(0));
        assert_eq!(nearest_index(&[40.5, 40.0], 40.25), Some(0));
        assert_eq!(nearest_index(&[1.0, 3.0, 1.0], 1.0), Some(0));
    }

    #[test]
    fn test_skips_nan_entries() {
        assert_eq!(nearest_index(&[f64::NAN, 5.0, 9.0], 0.0), Some(1));
        assert_eq!(nearest_index(&[f64::NAN, f64::NAN], 0.0), None);
    }

    #[test]
    fn test_empty_axis() {
        assert_eq!(nearest_index(&[], 0.0), None);
    }

    #[test]
    fn test_out_of_coverage_clamps_to_edge() {
        assert_eq!(nearest_index(&[-10.0, 0.0, 10.0], 80.0), Some(2));
        assert_eq!(nearest_index(&[-10.0, 0.0, 10.0], -80.0), Some(0));
    }
}
