//! The closed set of queryable weather variables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A variable that can be requested from the point-query API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherVariable {
    /// 2 m air temperature, reported in degrees Celsius.
    Temperature,
    /// 10 m wind, reported as its (u, v) components.
    WindSpeed,
    /// Accumulated precipitation over the preceding 6 hours.
    Precipitation,
}

impl WeatherVariable {
    pub const ALL: [WeatherVariable; 3] = [
        WeatherVariable::Temperature,
        WeatherVariable::WindSpeed,
        WeatherVariable::Precipitation,
    ];

    /// Wire name used in requests and responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherVariable::Temperature => "temperature",
            WeatherVariable::WindSpeed => "wind_speed",
            WeatherVariable::Precipitation => "precipitation",
        }
    }

    /// Whether values of this variable are vectors rather than scalars.
    pub fn is_vector(&self) -> bool {
        matches!(self, WeatherVariable::WindSpeed)
    }

    /// Bracketed list of wire names, e.g. for error messages.
    pub fn valid_names() -> String {
        let names: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
        format!("[{}]", names.join(", "))
    }
}

impl fmt::Display for WeatherVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known variable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown weather variable: {0}")]
pub struct UnknownVariable(pub String);

impl FromStr for WeatherVariable {
    type Err = UnknownVariable;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownVariable(s.to_string()))
    }
}
