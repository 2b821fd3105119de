//! Dataset backend traits.
//!
//! A [`DatasetOpener`] knows where a dataset lives and hands out
//! [`GridHandle`]s; the engine never touches files directly.

use std::ops::Range;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::DatasetMetadata;

/// An opened, read-only gridded dataset.
///
/// Every data variable is indexed `(time, latitude, longitude)` over the
/// three coordinate axes. Coordinates are available without reading any
/// variable payload.
pub trait GridHandle {
    /// Valid times, non-decreasing.
    fn times(&self) -> &[DateTime<Utc>];

    fn latitudes(&self) -> &[f64];

    fn longitudes(&self) -> &[f64];

    fn has_variable(&self, name: &str) -> bool;

    /// Names of the data variables (coordinates excluded).
    fn variable_names(&self) -> Vec<String>;

    /// Values of `name` at one cell for a range of timesteps.
    fn read_series(&self, name: &str, time: Range<usize>, lat: usize, lon: usize)
        -> Result<Vec<f64>>;

    /// Value of `name` at one cell and timestep.
    fn read_value(&self, name: &str, time: usize, lat: usize, lon: usize) -> Result<f64>;
}

/// Opens handles on one dataset.
pub trait DatasetOpener: Send + Sync {
    type Handle: GridHandle;

    /// Open the dataset, reading coordinates and the variable catalog.
    fn open(&self) -> Result<Self::Handle>;

    /// Compute metadata with as little I/O as the backend allows.
    fn read_metadata(&self) -> Result<DatasetMetadata> {
        let handle = self.open()?;
        Ok(DatasetMetadata::from_handle(&handle))
    }

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

impl<H: GridHandle + ?Sized> GridHandle for Arc<H> {
    fn times(&self) -> &[DateTime<Utc>] {
        (**self).times()
    }

    fn latitudes(&self) -> &[f64] {
        (**self).latitudes()
    }

    fn longitudes(&self) -> &[f64] {
        (**self).longitudes()
    }

    fn has_variable(&self, name: &str) -> bool {
        (**self).has_variable(name)
    }

    fn variable_names(&self) -> Vec<String> {
        (**self).variable_names()
    }

    fn read_series(
        &self,
        name: &str,
        time: Range<usize>,
        lat: usize,
        lon: usize,
    ) -> Result<Vec<f64>> {
        (**self).read_series(name, time, lat, lon)
    }

    fn read_value(&self, name: &str, time: usize, lat: usize, lon: usize) -> Result<f64> {
        (**self).read_value(name, time, lat, lon)
    }
}
