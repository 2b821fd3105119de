//! Configuration for the query engine.

use serde::{Deserialize, Serialize};
use weather_common::WeatherVariable;

use crate::error::{QueryError, Result};

/// Dataset variable names backing each queryable variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFields {
    /// 2 m temperature in Kelvin.
    pub temperature: String,
    /// Eastward 10 m wind component.
    pub u_wind: String,
    /// Northward 10 m wind component.
    pub v_wind: String,
    /// Six-hour accumulated precipitation.
    pub precipitation: String,
}

impl Default for SourceFields {
    fn default() -> Self {
        Self {
            temperature: "t2m".to_string(),
            u_wind: "u10".to_string(),
            v_wind: "v10".to_string(),
            precipitation: "tp6h".to_string(),
        }
    }
}

impl SourceFields {
    /// Source fields read for `variable`, in output order.
    pub fn for_variable(&self, variable: WeatherVariable) -> Vec<&str> {
        match variable {
            WeatherVariable::Temperature => vec![self.temperature.as_str()],
            WeatherVariable::WindSpeed => vec![self.u_wind.as_str(), self.v_wind.as_str()],
            WeatherVariable::Precipitation => vec![self.precipitation.as_str()],
        }
    }
}

/// Configuration for the query engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    pub fields: SourceFields,

    /// Decimal places kept when values are rendered as text.
    pub value_precision: usize,

    /// Separator between the two components of a vector value.
    pub wind_delimiter: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            fields: SourceFields::default(),
            value_precision: 6,
            wind_delimiter: ",".to_string(),
        }
    }
}

impl QueryConfig {
    /// Largest precision that still formats f64 values meaningfully.
    pub const MAX_PRECISION: usize = 15;

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("WEATHER_TEMPERATURE_FIELD") {
            config.fields.temperature = val;
        }

        if let Ok(val) = std::env::var("WEATHER_U_WIND_FIELD") {
            config.fields.u_wind = val;
        }

        if let Ok(val) = std::env::var("WEATHER_V_WIND_FIELD") {
            config.fields.v_wind = val;
        }

        if let Ok(val) = std::env::var("WEATHER_PRECIPITATION_FIELD") {
            config.fields.precipitation = val;
        }

        if let Ok(val) = std::env::var("WEATHER_VALUE_PRECISION") {
            if let Ok(precision) = val.parse() {
                config.value_precision = precision;
            }
        }

        if let Ok(val) = std::env::var("WEATHER_WIND_DELIMITER") {
            config.wind_delimiter = val;
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.value_precision > Self::MAX_PRECISION {
            return Err(QueryError::ConfigError(format!(
                "value_precision must be at most {}",
                Self::MAX_PRECISION
            )));
        }

        if self.wind_delimiter.is_empty() {
            return Err(QueryError::ConfigError(
                "wind_delimiter must not be empty".to_string(),
            ));
        }

        let fields = &self.fields;
        for name in [
            &fields.temperature,
            &fields.u_wind,
            &fields.v_wind,
            &fields.precipitation,
        ] {
            if name.trim().is_empty() {
                return Err(QueryError::ConfigError(
                    "source field names must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}
