//! Error types for NetCDF parsing operations.

use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF parsing.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Missing required variable or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Index outside a variable's shape
    #[error("Index out of bounds for '{variable}': {index:?} not within {shape:?}")]
    OutOfBounds {
        variable: String,
        index: Vec<usize>,
        shape: Vec<usize>,
    },

    /// Content the reader does not interpret (e.g. a non-gregorian calendar)
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Error reported by libnetcdf
    #[error("NetCDF library error: {0}")]
    Library(#[from] netcdf::Error),
}

impl NetCdfError {
    pub fn missing(what: impl Into<String>) -> Self {
        Self::MissingData(what.into())
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidFormat(reason.into())
    }
}
