//! NetCDF reader for gridded weather datasets.
//!
//! Opens a file, exposes its variable catalog and reads point series
//! lazily, so a query touches only the cells it needs.
//!
//! # Formats
//!
//! Classic (CDF-1), 64-bit offset (CDF-2), 64-bit data (CDF-5) and
//! NetCDF-4 (HDF5) files are all read through libnetcdf (the `netcdf`
//! crate). Files without a NetCDF signature are rejected before libnetcdf
//! sees them.
//!
//! # Example
//!
//! ```no_run
//! use netcdf_parser::GridFile;
//!
//! let file = GridFile::open("public/weather_data.nc")?;
//! let axes = file.read_axes()?;
//! let t2m = file.read_series("t2m", 0..axes.times.len(), 10, 20)?;
//! # Ok::<(), netcdf_parser::NetCdfError>(())
//! ```

pub mod axes;
pub mod error;
pub mod file;
pub mod native;
pub mod variable;

pub use axes::{decode_times, GridAxes, LATITUDE_NAMES, LONGITUDE_NAMES, TIME_NAMES};
pub use error::{NetCdfError, NetCdfResult};
pub use file::{FileFormat, GridFile};
pub use variable::{Attribute, AttributeValue, Packing, VariableInfo};

pub use native::silence_hdf5_errors;
