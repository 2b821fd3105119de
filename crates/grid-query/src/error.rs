//! Error types for point queries.

use thiserror::Error;
use weather_common::{WeatherError, WeatherVariable};

/// Why a request was refused before touching the dataset.
///
/// The `Display` text is returned to the caller verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Missing required parameters. Need: start_time, end_time, lat, lon, type")]
    MissingParameters,

    #[error("Invalid type. Must be one of: {}", WeatherVariable::valid_names())]
    InvalidType,

    #[error("start_time must be less than end_time")]
    StartNotBeforeEnd,

    #[error("Invalid timestamp")]
    InvalidTimestamp,

    #[error("Invalid coordinates. Latitude must be [-90, 90], longitude must be [-180, 180]")]
    InvalidCoordinates,
}

/// Errors that can occur while answering a query.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The request failed validation.
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// The dataset could not be opened or is malformed.
    #[error("dataset unavailable: {0}")]
    DatasetUnavailable(String),

    /// A read from an open dataset failed.
    #[error("failed to read grid data: {0}")]
    ReadFailed(String),

    /// Invalid engine configuration.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Anything else.
    #[error("internal error: {0}")]
    Internal(String),
}

impl QueryError {
    /// Create a DatasetUnavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::DatasetUnavailable(msg.into())
    }

    /// Create a ReadFailed error.
    pub fn read_failed(msg: impl Into<String>) -> Self {
        Self::ReadFailed(msg.into())
    }

    /// Create an Internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, QueryError::Rejected(_))
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::Rejected(_) => "rejected",
            QueryError::DatasetUnavailable(_) => "unavailable",
            QueryError::ReadFailed(_) => "read_failed",
            QueryError::ConfigError(_) => "config",
            QueryError::Internal(_) => "internal",
        }
    }

    /// Client errors are 400; everything else is a service fault.
    pub fn http_status_code(&self) -> u16 {
        if self.is_rejection() {
            400
        } else {
            500
        }
    }
}

impl From<netcdf_parser::NetCdfError> for QueryError {
    fn from(err: netcdf_parser::NetCdfError) -> Self {
        Self::ReadFailed(err.to_string())
    }
}

impl From<QueryError> for WeatherError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Rejected(reason) => WeatherError::InvalidRequest(reason.to_string()),
            QueryError::DatasetUnavailable(msg) => WeatherError::DatasetUnavailable(msg),
            QueryError::ReadFailed(msg) => WeatherError::DataReadError(msg),
            QueryError::ConfigError(msg) | QueryError::Internal(msg) => {
                WeatherError::InternalError(msg)
            }
        }
    }
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
