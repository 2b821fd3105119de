//! Point/time query engine over a gridded weather dataset.
//!
//! Given a time window, a location and a variable, returns the series of
//! values at the nearest grid cell:
//!
//! ```text
//! QueryParams
//!      │
//!      ▼
//! validate()            reject bad input before any I/O
//!      │
//!      ▼
//! DatasetManager::acquire()   one handle at a time, under a lock
//!      │
//!      ├─► filter()           inclusive [start, end] over the time axis
//!      ├─► resolve_nearest()  nearest latitude / longitude index
//!      └─► extract()          one value per timestep, unit conversion,
//!                             NaN / inf / missing become null
//!      │
//!      ▼
//! lease dropped (handle closed, lock released)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use grid_query::{NetCdfOpener, QueryConfig, QueryEngine};
//!
//! let opener = NetCdfOpener::new("public/weather_data.nc");
//! let engine = QueryEngine::new(opener, QueryConfig::default())?;
//! let result = engine.query_point(1_748_736_000, 1_748_822_400, 40.7, -74.0, "temperature")?;
//! println!("{} points", result.metadata.count);
//! # Ok::<(), grid_query::QueryError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod filter;
pub mod format;
pub mod manager;
pub mod memory;
pub mod netcdf;
pub mod resolve;
pub mod source;
pub mod types;
pub mod validate;

// Re-export commonly used types at crate root
pub use config::{QueryConfig, SourceFields};
pub use engine::QueryEngine;
pub use error::{QueryError, Rejection, Result};
pub use extract::{extract, KELVIN_OFFSET};
pub use filter::{filter, FilteredView};
pub use format::{format_value, ValueFormat};
pub use manager::{DatasetLease, DatasetManager, MetadataCache};
pub use memory::{MemoryDataset, MemoryGrid};
pub use netcdf::{NetCdfGrid, NetCdfOpener};
pub use resolve::{nearest_index, resolve_nearest};
pub use source::{DatasetOpener, GridHandle};
pub use types::{
    DatasetMetadata, GridDimensions, GridPoint, PointValue, QueryParams, QueryRequest,
    QueryResponse, QueryResult, ResponsePoint, ResultMetadata, SeriesPoint,
};
pub use validate::validate;
