//! Error types for weather point-query services.

use thiserror::Error;

/// Result type alias using WeatherError.
pub type WeatherResult<T> = Result<T, WeatherError>;

/// Message returned to callers for every service-side failure.
///
/// Internal details stay in the logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Primary error type for point queries.
#[derive(Debug, Error)]
pub enum WeatherError {
    // === Client Errors ===
    #[error("{0}")]
    InvalidRequest(String),

    // === Data Errors ===
    #[error("Dataset unavailable: {0}")]
    DatasetUnavailable(String),

    #[error("Failed to read data: {0}")]
    DataReadError(String),

    // === Infrastructure Errors ===
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl WeatherError {
    /// Whether the caller sent a bad request (as opposed to a service fault).
    pub fn is_client_error(&self) -> bool {
        matches!(self, WeatherError::InvalidRequest(_))
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            WeatherError::InvalidRequest(_) => 400,

            WeatherError::DatasetUnavailable(_)
            | WeatherError::DataReadError(_)
            | WeatherError::InternalError(_) => 500,
        }
    }

    /// The message safe to return across the transport boundary.
    ///
    /// Client errors carry their reason; service errors are generic.
    pub fn public_message(&self) -> String {
        match self {
            WeatherError::InvalidRequest(reason) => reason.clone(),
            _ => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<std::io::Error> for WeatherError {
    fn from(err: std::io::Error) -> Self {
        WeatherError::DatasetUnavailable(err.to_string())
    }
}
