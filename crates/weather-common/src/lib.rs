//! Common types and utilities shared across the weather point-query crates.

pub mod error;
pub mod time;
pub mod variable;

pub use error::{WeatherError, WeatherResult};
pub use time::{CfTimeUnits, TimeParseError, TimeRange, TimeUnit};
pub use variable::{UnknownVariable, WeatherVariable};
