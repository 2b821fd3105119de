//! Time handling utilities for gridded weather data.
//!
//! Dataset time axes follow the CF conventions: a numeric offset plus a
//! `units` attribute such as `"hours since 1900-01-01 00:00:00"`.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Convert integer seconds since the Unix epoch to a UTC instant.
pub fn from_epoch_seconds(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

/// Parse an ISO 8601 timestamp, assuming UTC when no offset is given.
pub fn parse_iso8601(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    let s = s.trim();

    // Try full datetime with timezone
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = s.trim_end_matches('Z').trim_end_matches(" UTC").trim();
    for fmt in [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    // Date only
    if let Ok(date) = NaiveDate::parse_from_str(naive, "%Y-%m-%d") {
        if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    Err(TimeParseError::InvalidFormat(s.to_string()))
}

/// A closed time range `[start, end]` for queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}

/// Base unit of a CF time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "seconds" | "second" | "secs" | "sec" | "s" => Some(TimeUnit::Seconds),
            "minutes" | "minute" | "mins" | "min" => Some(TimeUnit::Minutes),
            "hours" | "hour" | "hrs" | "hr" | "h" => Some(TimeUnit::Hours),
            "days" | "day" | "d" => Some(TimeUnit::Days),
            _ => None,
        }
    }

    pub fn seconds(&self) -> f64 {
        match self {
            TimeUnit::Seconds => 1.0,
            TimeUnit::Minutes => 60.0,
            TimeUnit::Hours => 3_600.0,
            TimeUnit::Days => 86_400.0,
        }
    }
}

/// Parsed CF `units` attribute of a time coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfTimeUnits {
    pub unit: TimeUnit,
    pub epoch: DateTime<Utc>,
}

impl Default for CfTimeUnits {
    /// Seconds since the Unix epoch.
    fn default() -> Self {
        Self {
            unit: TimeUnit::Seconds,
            epoch: DateTime::<Utc>::default(),
        }
    }
}

impl CfTimeUnits {
    /// Parse strings like `"hours since 1900-01-01 00:00:00.0"`.
    pub fn parse(units: &str) -> Result<Self, TimeParseError> {
        let (unit, reference) = units
            .split_once(" since ")
            .ok_or_else(|| TimeParseError::InvalidUnits(units.to_string()))?;

        let unit = TimeUnit::from_str(unit)
            .ok_or_else(|| TimeParseError::InvalidUnits(units.to_string()))?;
        let epoch = parse_iso8601(reference)?;

        Ok(Self { unit, epoch })
    }

    /// Decode a raw offset into an instant, rounded to the millisecond.
    ///
    /// Returns `None` for non-finite offsets and offsets beyond ~30,000 years.
    pub fn decode(&self, offset: f64) -> Option<DateTime<Utc>> {
        if !offset.is_finite() {
            return None;
        }
        let millis = (offset * self.unit.seconds() * 1000.0).round();
        if millis.abs() >= 1.0e15 {
            return None;
        }
        self.epoch
            .checked_add_signed(Duration::milliseconds(millis as i64))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),

    #[error("Invalid CF time units: {0}")]
    InvalidUnits(String),
}
