//! In-memory grid backend.
//!
//! Useful for tests and for embedding small datasets that are already
//! loaded. Fields are row-major `(time, latitude, longitude)`.

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{QueryError, Result};
use crate::source::{DatasetOpener, GridHandle};

/// A fully loaded grid.
#[derive(Debug, Clone, Default)]
pub struct MemoryGrid {
    times: Vec<DateTime<Utc>>,
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    fields: BTreeMap<String, Vec<f64>>,
}

impl MemoryGrid {
    pub fn new(times: Vec<DateTime<Utc>>, latitudes: Vec<f64>, longitudes: Vec<f64>) -> Self {
        Self {
            times,
            latitudes,
            longitudes,
            fields: BTreeMap::new(),
        }
    }

    /// Cells per timestep times the number of timesteps.
    pub fn field_len(&self) -> usize {
        self.times.len() * self.latitudes.len() * self.longitudes.len()
    }

    /// Add a field; `values` must cover the whole grid.
    pub fn with_field(mut self, name: &str, values: Vec<f64>) -> Result<Self> {
        if values.len() != self.field_len() {
            return Err(QueryError::internal(format!(
                "field '{}' has {} values, grid needs {}",
                name,
                values.len(),
                self.field_len()
            )));
        }
        self.fields.insert(name.to_string(), values);
        Ok(self)
    }

    fn field(&self, name: &str) -> Result<&[f64]> {
        self.fields
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| QueryError::read_failed(format!("no variable '{}'", name)))
    }

    fn offset(&self, time: usize, lat: usize, lon: usize) -> Result<usize> {
        let (ny, nx) = (self.latitudes.len(), self.longitudes.len());
        if time >= self.times.len() || lat >= ny || lon >= nx {
            return Err(QueryError::read_failed(format!(
                "index ({}, {}, {}) outside grid ({}, {}, {})",
                time,
                lat,
                lon,
                self.times.len(),
                ny,
                nx
            )));
        }
        Ok((time * ny + lat) * nx + lon)
    }
}

impl GridHandle for MemoryGrid {
    fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    fn longitudes(&self) -> &[f64] {
        &self.longitudes
    }

    fn has_variable(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    fn variable_names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }

    fn read_series(
        &self,
        name: &str,
        time: Range<usize>,
        lat: usize,
        lon: usize,
    ) -> Result<Vec<f64>> {
        let field = self.field(name)?;
        time.map(|t| self.offset(t, lat, lon).map(|i| field[i]))
            .collect()
    }

    fn read_value(&self, name: &str, time: usize, lat: usize, lon: usize) -> Result<f64> {
        let field = self.field(name)?;
        Ok(field[self.offset(time, lat, lon)?])
    }
}

/// Opener that hands out shared references to one [`MemoryGrid`].
#[derive(Debug, Clone)]
pub struct MemoryDataset {
    grid: Arc<MemoryGrid>,
}

impl MemoryDataset {
    pub fn new(grid: MemoryGrid) -> Self {
        Self {
            grid: Arc::new(grid),
        }
    }
}

impl DatasetOpener for MemoryDataset {
    type Handle = Arc<MemoryGrid>;

    fn open(&self) -> Result<Self::Handle> {
        Ok(Arc::clone(&self.grid))
    }

    fn describe(&self) -> String {
        format!(
            "memory grid {}x{}x{}",
            self.grid.times.len(),
            self.grid.latitudes.len(),
            self.grid.longitudes.len()
        )
    }
}
