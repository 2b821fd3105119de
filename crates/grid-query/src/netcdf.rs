//! NetCDF file backend.

use std::ops::Range;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use netcdf_parser::{GridAxes, GridFile};
use tracing::{debug, info};

use crate::error::{QueryError, Result};
use crate::source::{DatasetOpener, GridHandle};
use crate::types::DatasetMetadata;

/// Opens a NetCDF file on every acquisition.
#[derive(Debug, Clone)]
pub struct NetCdfOpener {
    path: PathBuf,
}

impl NetCdfOpener {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetOpener for NetCdfOpener {
    type Handle = NetCdfGrid;

    fn open(&self) -> Result<NetCdfGrid> {
        NetCdfGrid::open(&self.path)
    }

    fn read_metadata(&self) -> Result<DatasetMetadata> {
        // Header and coordinates only; no data variable is read.
        let grid = NetCdfGrid::open(&self.path)?;
        let metadata = DatasetMetadata::from_handle(&grid);
        info!(
            path = %self.path.display(),
            times = metadata.dimensions.time,
            latitudes = metadata.dimensions.latitude,
            longitudes = metadata.dimensions.longitude,
            "Read dataset metadata"
        );
        Ok(metadata)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// An open NetCDF dataset with its coordinates loaded.
///
/// The file is closed when the handle is dropped.
pub struct NetCdfGrid {
    file: GridFile,
    axes: GridAxes,
    data_variables: Vec<String>,
}

impl NetCdfGrid {
    pub fn open(path: &Path) -> Result<Self> {
        let file = GridFile::open(path)
            .map_err(|e| QueryError::unavailable(format!("{}: {}", path.display(), e)))?;
        let axes = file
            .read_axes()
            .map_err(|e| QueryError::unavailable(format!("{}: {}", path.display(), e)))?;

        let data_variables = file
            .variables()
            .iter()
            .filter(|v| v.ndim() == 3)
            .map(|v| v.name.clone())
            .collect();

        debug!(
            path = %path.display(),
            times = axes.times.len(),
            "Opened dataset"
        );

        Ok(Self {
            file,
            axes,
            data_variables,
        })
    }
}

impl GridHandle for NetCdfGrid {
    fn times(&self) -> &[DateTime<Utc>] {
        &self.axes.times
    }

    fn latitudes(&self) -> &[f64] {
        &self.axes.latitudes
    }

    fn longitudes(&self) -> &[f64] {
        &self.axes.longitudes
    }

    fn has_variable(&self, name: &str) -> bool {
        self.data_variables.iter().any(|v| v == name)
    }

    fn variable_names(&self) -> Vec<String> {
        self.data_variables.clone()
    }

    fn read_series(
        &self,
        name: &str,
        time: Range<usize>,
        lat: usize,
        lon: usize,
    ) -> Result<Vec<f64>> {
        Ok(self.file.read_series(name, time, lat, lon)?)
    }

    fn read_value(&self, name: &str, time: usize, lat: usize, lon: usize) -> Result<f64> {
        Ok(self.file.read_value(name, &[time, lat, lon])?)
    }
}
