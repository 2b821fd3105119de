//! Reading NetCDF files produced by the test fixtures.

use chrono::{TimeZone, Utc};
use netcdf_parser::{FileFormat, GridFile, NetCdfError};
use test_utils::classic::{oversized_attribute_length, oversized_dimension_count, write_bytes_temp};
use test_utils::netcdf::{GridWriter, Values};
use test_utils::{assert_approx_eq, temperature_kelvin, u_wind, SampleGrid};

fn open(writer: &GridWriter) -> (tempfile::NamedTempFile, GridFile) {
    let tmp = writer.write_temp().unwrap();
    let file = GridFile::open(tmp.path()).unwrap();
    (tmp, file)
}

#[test]
fn test_reads_axes_with_cf_time() {
    let grid = SampleGrid::default();
    let (_tmp, file) = open(&grid.writer());

    assert_eq!(file.format(), FileFormat::Hdf5);
    let axes = file.read_axes().unwrap();
    assert_eq!(axes.times.len(), 4);
    assert_eq!(axes.times[0], Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
    assert_eq!(axes.times[3], Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap());
    assert_eq!(axes.latitudes, grid.latitudes);
    assert_eq!(axes.longitudes, grid.longitudes);
}

#[test]
fn test_epoch_seconds_without_units() {
    let grid = SampleGrid {
        hours_since_1900: false,
        ..SampleGrid::default()
    };
    let (_tmp, file) = open(&grid.writer());

    let axes = file.read_axes().unwrap();
    assert_eq!(axes.times[1].timestamp(), grid.times[1]);
}

#[test]
fn test_read_series_and_value() {
    let (_tmp, file) = open(&SampleGrid::default().writer());

    let series = file.read_series("t2m", 1..4, 2, 3).unwrap();
    let expected: Vec<f64> = (1..4).map(|t| temperature_kelvin(t, 2, 3)).collect();
    assert_eq!(series, expected);

    let value = file.read_value("u10", &[3, 4, 0]).unwrap();
    assert_eq!(value, u_wind(3, 4, 0));

    assert!(file.read_series("t2m", 2..2, 0, 0).unwrap().is_empty());
}

#[test]
fn test_unlimited_time_dimension() {
    let grid = SampleGrid {
        record_time: true,
        ..SampleGrid::default()
    };
    let (_tmp, file) = open(&grid.writer());

    let t2m = file.variable("t2m").unwrap();
    assert_eq!(t2m.shape, vec![4, 5, 4]);

    let axes = file.read_axes().unwrap();
    assert_eq!(axes.times.len(), 4);

    let series = file.read_series("t2m", 0..4, 4, 1).unwrap();
    let expected: Vec<f64> = (0..4).map(|t| temperature_kelvin(t, 4, 1)).collect();
    assert_eq!(series, expected);
}

#[test]
fn test_packed_short_with_fill() {
    let mut w = GridWriter::new();
    w.dimension("time", 3)
        .dimension("latitude", 1)
        .dimension("longitude", 1);
    w.variable(
        "t2m",
        &["time", "latitude", "longitude"],
        Values::Short(vec![5000, -32767, 0]),
    )
    .double_attr("scale_factor", 0.01)
    .double_attr("add_offset", 250.0)
    .attr("_FillValue", Values::Short(vec![-32767]));
    let (_tmp, file) = open(&w);

    let series = file.read_series("t2m", 0..3, 0, 0).unwrap();
    assert_approx_eq!(series[0], 300.0, 1e-9);
    assert!(series[1].is_nan());
    assert_approx_eq!(series[2], 250.0, 1e-9);
}

#[test]
fn test_classic_format() {
    let grid = SampleGrid::default();
    let tmp = write_bytes_temp(&grid.classic_bytes()).unwrap();
    let file = GridFile::open(tmp.path()).unwrap();

    assert_eq!(file.format(), FileFormat::Classic);
    assert!(file.format().is_classic());
    let axes = file.read_axes().unwrap();
    assert_eq!(axes.times[2].timestamp(), grid.times[2]);
    assert_eq!(axes.latitudes, grid.latitudes);

    let series = file.read_series("t2m", 0..4, 3, 2).unwrap();
    let expected: Vec<f64> = (0..4).map(|t| temperature_kelvin(t, 3, 2)).collect();
    assert_eq!(series, expected);
}

#[test]
fn test_catalog() {
    let (_tmp, file) = open(&SampleGrid::default().writer());

    for name in ["time", "latitude", "longitude", "t2m", "u10", "v10", "tp6h"] {
        assert!(file.has_variable(name), "missing {name}");
    }
    let t2m = file.variable("t2m").unwrap();
    assert_eq!(t2m.dimensions, vec!["time", "latitude", "longitude"]);
    assert_eq!(t2m.units(), Some("K"));
}

#[test]
fn test_missing_variable_and_bounds() {
    let (_tmp, file) = open(&SampleGrid::default().writer());

    assert!(matches!(
        file.read_series("sp", 0..1, 0, 0),
        Err(NetCdfError::MissingData(_))
    ));
    assert!(matches!(
        file.read_series("t2m", 0..5, 0, 0),
        Err(NetCdfError::OutOfBounds { .. })
    ));
    assert!(matches!(
        file.read_value("t2m", &[0, 5, 0]),
        Err(NetCdfError::OutOfBounds { .. })
    ));
    assert!(matches!(
        file.read_series("latitude", 0..1, 0, 0),
        Err(NetCdfError::InvalidFormat(_))
    ));
}

#[test]
fn test_missing_coordinate() {
    let mut w = SampleGrid::default().writer();
    w.remove_variable("latitude");
    let (_tmp, file) = open(&w);

    assert!(matches!(file.read_axes(), Err(NetCdfError::MissingData(_))));
}

#[test]
fn test_alternate_coordinate_names() {
    let mut w = GridWriter::new();
    w.dimension("valid_time", 1)
        .dimension("lat", 2)
        .dimension("lon", 1);
    w.variable("valid_time", &["valid_time"], Values::Double(vec![0.0]))
        .text_attr("units", "seconds since 1970-01-01");
    w.variable("lat", &["lat"], Values::Float(vec![10.0, 9.5]));
    w.variable("lon", &["lon"], Values::Float(vec![20.0]));
    let (_tmp, file) = open(&w);

    let axes = file.read_axes().unwrap();
    assert_eq!(axes.latitudes, vec![10.0, 9.5]);
    assert_eq!(axes.longitudes, vec![20.0]);
}

#[test]
fn test_unsupported_calendar() {
    let mut w = GridWriter::new();
    w.dimension("time", 1)
        .dimension("latitude", 1)
        .dimension("longitude", 1);
    w.variable("time", &["time"], Values::Double(vec![0.0]))
        .text_attr("units", "days since 2000-01-01")
        .text_attr("calendar", "360_day");
    w.variable("latitude", &["latitude"], Values::Double(vec![0.0]));
    w.variable("longitude", &["longitude"], Values::Double(vec![0.0]));
    let (_tmp, file) = open(&w);

    assert!(matches!(file.read_axes(), Err(NetCdfError::Unsupported(_))));
}

#[test]
fn test_rejects_non_netcdf() {
    let tmp = write_bytes_temp(b"GRIB2 is not NetCDF").unwrap();
    assert!(matches!(
        GridFile::open(tmp.path()),
        Err(NetCdfError::InvalidFormat(_))
    ));

    assert!(matches!(
        GridFile::open("/nonexistent/weather_data.nc"),
        Err(NetCdfError::IoError(_))
    ));
}

#[test]
fn test_oversized_dimension_count_is_an_error() {
    let tmp = write_bytes_temp(&oversized_dimension_count()).unwrap();
    assert!(matches!(
        GridFile::open(tmp.path()),
        Err(NetCdfError::Library(_))
    ));
}

#[test]
fn test_oversized_attribute_length_is_an_error() {
    let tmp = write_bytes_temp(&oversized_attribute_length()).unwrap();
    assert!(matches!(
        GridFile::open(tmp.path()),
        Err(NetCdfError::Library(_))
    ));
}

#[test]
fn test_truncated_files_are_errors() {
    let classic = SampleGrid::default().classic_bytes();
    // Cut inside the dimension list.
    let tmp = write_bytes_temp(&classic[..24]).unwrap();
    assert!(GridFile::open(tmp.path()).is_err());

    let hdf5 = SampleGrid::default().writer().write_temp().unwrap();
    let bytes = std::fs::read(hdf5.path()).unwrap();
    let tmp = write_bytes_temp(&bytes[..bytes.len() / 2]).unwrap();
    assert!(GridFile::open(tmp.path()).is_err());

    // Signature only.
    let tmp = write_bytes_temp(b"\x89HDF\r\n\x1a\n").unwrap();
    assert!(GridFile::open(tmp.path()).is_err());
}
