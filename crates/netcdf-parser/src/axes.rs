//! Coordinate axis discovery for regular lat/lon grids.

use chrono::{DateTime, Utc};
use tracing::warn;
use weather_common::CfTimeUnits;

use crate::error::{NetCdfError, NetCdfResult};
use crate::file::GridFile;
use crate::variable::VariableInfo;

/// Accepted names for the time coordinate, in lookup order.
pub const TIME_NAMES: [&str; 2] = ["time", "valid_time"];
pub const LATITUDE_NAMES: [&str; 2] = ["latitude", "lat"];
pub const LONGITUDE_NAMES: [&str; 2] = ["longitude", "lon"];

/// Calendars that agree with chrono's proleptic Gregorian calendar.
const GREGORIAN_CALENDARS: [&str; 3] = ["standard", "gregorian", "proleptic_gregorian"];

/// The three coordinate axes of a gridded dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct GridAxes {
    pub times: Vec<DateTime<Utc>>,
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
}

impl GridFile {
    /// First variable whose name matches one of `candidates`.
    pub fn find_variable(&self, candidates: &[&str]) -> Option<&VariableInfo> {
        candidates.iter().find_map(|name| self.variable(name))
    }

    fn coordinate(&self, candidates: &[&str]) -> NetCdfResult<&VariableInfo> {
        let var = self.find_variable(candidates).ok_or_else(|| {
            NetCdfError::missing(format!("coordinate variable (one of {:?})", candidates))
        })?;
        if var.ndim() != 1 {
            return Err(NetCdfError::invalid(format!(
                "coordinate '{}' has {} dimensions, expected 1",
                var.name,
                var.ndim()
            )));
        }
        Ok(var)
    }

    /// Read and decode the time, latitude and longitude axes.
    pub fn read_axes(&self) -> NetCdfResult<GridAxes> {
        let time = self.coordinate(&TIME_NAMES)?;
        if let Some(calendar) = time.attribute("calendar").and_then(|v| v.as_str()) {
            if !GREGORIAN_CALENDARS.contains(&calendar.to_lowercase().as_str()) {
                return Err(NetCdfError::Unsupported(format!("calendar '{}'", calendar)));
            }
        }
        let raw_times = self.read_all(&time.name)?;
        let times = decode_times(&raw_times, time.units())?;

        let latitudes = self.read_all(&self.coordinate(&LATITUDE_NAMES)?.name)?;
        let longitudes = self.read_all(&self.coordinate(&LONGITUDE_NAMES)?.name)?;

        Ok(GridAxes {
            times,
            latitudes,
            longitudes,
        })
    }
}

/// Decode raw CF time offsets.
///
/// Without a `units` attribute the values are taken as seconds since the
/// Unix epoch.
pub fn decode_times(raw: &[f64], units: Option<&str>) -> NetCdfResult<Vec<DateTime<Utc>>> {
    let units = match units {
        Some(u) => CfTimeUnits::parse(u).map_err(|e| NetCdfError::invalid(e.to_string()))?,
        None => {
            warn!("Time coordinate has no units attribute, assuming seconds since 1970-01-01");
            CfTimeUnits::default()
        }
    };

    raw.iter()
        .map(|&offset| {
            units
                .decode(offset)
                .ok_or_else(|| NetCdfError::invalid(format!("undecodable time offset {}", offset)))
        })
        .collect()
}
