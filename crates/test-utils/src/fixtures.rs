//! Common test fixtures for weather point-query tests.
//!
//! [`SampleGrid`] describes a small ERA5-style dataset and can render it as
//! a NetCDF-4 file (or a hand-laid CDF-1 image) with the conventional
//! variable names.

use crate::generators::{
    create_precipitation_field, create_temperature_field, create_u_wind_field,
    create_v_wind_field, epoch_times, regular_axis, JUNE_1_2025, SIX_HOURS,
};
use crate::classic::ClassicBytes;
use crate::netcdf::{GridWriter, Values};

/// Seconds between 1900-01-01 and the Unix epoch.
const SECONDS_1900_TO_1970: i64 = 2_208_988_800;

/// Seed used for the sample precipitation field.
pub const PRECIP_SEED: u32 = 7;

/// Shape and coordinates of a synthetic dataset.
#[derive(Debug, Clone)]
pub struct SampleGrid {
    /// Valid times, seconds since the Unix epoch.
    pub times: Vec<i64>,
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
    /// Encode time as "hours since 1900-01-01" (ERA5 style) instead of
    /// seconds since the epoch without a units attribute.
    pub hours_since_1900: bool,
    /// Store time as the unlimited dimension.
    pub record_time: bool,
}

impl Default for SampleGrid {
    /// Four six-hourly steps from 2025-06-01 on a 5 x 4 grid with
    /// descending latitudes, like ERA5.
    fn default() -> Self {
        Self {
            times: epoch_times(JUNE_1_2025, SIX_HOURS, 4),
            latitudes: regular_axis(41.0, -0.25, 5),
            longitudes: regular_axis(-74.5, 0.25, 4),
            hours_since_1900: true,
            record_time: false,
        }
    }
}

impl SampleGrid {
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.times.len(), self.latitudes.len(), self.longitudes.len())
    }

    /// Writer holding the coordinates only.
    pub fn coordinates_writer(&self) -> GridWriter {
        let (nt, ny, nx) = self.shape();
        let mut w = GridWriter::new();
        if self.record_time {
            w.unlimited_dimension("time", nt);
        } else {
            w.dimension("time", nt);
        }
        w.dimension("latitude", ny).dimension("longitude", nx);

        if self.hours_since_1900 {
            let hours = self
                .times
                .iter()
                .map(|&t| ((t + SECONDS_1900_TO_1970) / 3_600) as i32)
                .collect();
            w.variable("time", &["time"], Values::Int(hours))
                .text_attr("units", "hours since 1900-01-01 00:00:00.0")
                .text_attr("calendar", "gregorian");
        } else {
            let secs = self.times.iter().map(|&t| t as f64).collect();
            w.variable("time", &["time"], Values::Double(secs));
        }

        w.variable("latitude", &["latitude"], Values::Double(self.latitudes.clone()))
            .text_attr("units", "degrees_north");
        w.variable("longitude", &["longitude"], Values::Double(self.longitudes.clone()))
            .text_attr("units", "degrees_east");
        w
    }

    /// Writer holding coordinates plus `t2m`, `u10`, `v10` and `tp6h`
    /// filled from the generators.
    pub fn writer(&self) -> GridWriter {
        let (nt, ny, nx) = self.shape();
        let mut w = self.coordinates_writer();
        let dims = ["time", "latitude", "longitude"];

        w.variable("t2m", &dims, Values::Double(create_temperature_field(nt, ny, nx)))
            .text_attr("units", "K");
        w.variable("u10", &dims, Values::Double(create_u_wind_field(nt, ny, nx)))
            .text_attr("units", "m s**-1");
        w.variable("v10", &dims, Values::Double(create_v_wind_field(nt, ny, nx)))
            .text_attr("units", "m s**-1");
        w.variable(
            "tp6h",
            &dims,
            Values::Double(create_precipitation_field(nt, ny, nx, PRECIP_SEED)),
        )
        .text_attr("units", "m");
        w
    }

    /// The same dataset as a CDF-1 byte image. Time is always stored as
    /// hours since 1900 here, and `record_time` is ignored.
    pub fn classic_bytes(&self) -> Vec<u8> {
        let (nt, ny, nx) = self.shape();
        let dims = ["time", "latitude", "longitude"];
        let hours = self
            .times
            .iter()
            .map(|&t| ((t + SECONDS_1900_TO_1970) / 3_600) as f64)
            .collect();

        let mut b = ClassicBytes::new();
        b.dimension("time", nt)
            .dimension("latitude", ny)
            .dimension("longitude", nx);
        b.variable("time", &["time"], hours, Some("hours since 1900-01-01 00:00:00.0"))
            .variable("latitude", &["latitude"], self.latitudes.clone(), None)
            .variable("longitude", &["longitude"], self.longitudes.clone(), None)
            .variable("t2m", &dims, create_temperature_field(nt, ny, nx), Some("K"))
            .variable("u10", &dims, create_u_wind_field(nt, ny, nx), None)
            .variable("v10", &dims, create_v_wind_field(nt, ny, nx), None)
            .variable(
                "tp6h",
                &dims,
                create_precipitation_field(nt, ny, nx, PRECIP_SEED),
                Some("m"),
            );
        b.to_bytes()
    }
}
