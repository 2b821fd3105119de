//! Text rendering of numeric values.

use crate::config::QueryConfig;

/// How values are written on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueFormat {
    pub precision: usize,
    pub delimiter: String,
}

impl Default for ValueFormat {
    fn default() -> Self {
        Self::from(&QueryConfig::default())
    }
}

impl From<&QueryConfig> for ValueFormat {
    fn from(config: &QueryConfig) -> Self {
        Self {
            precision: config.value_precision,
            delimiter: config.wind_delimiter.clone(),
        }
    }
}

impl ValueFormat {
    pub fn number(&self, value: f64) -> String {
        format_value(value, self.precision)
    }
}

/// Round to `precision` decimals and trim trailing zeros.
///
/// `300.0 - 273.15` renders as `"26.85"`; negative zero renders as `"0"`.
pub fn format_value(value: f64, precision: usize) -> String {
    let fixed = format!("{:.*}", precision, value);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };

    match trimmed {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}
