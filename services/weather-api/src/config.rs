//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use grid_query::QueryConfig;

/// Weather point-query server
#[derive(Parser, Debug, Clone)]
#[command(name = "weather-api")]
#[command(about = "Point/time weather query server over a NetCDF dataset")]
pub struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:5328", env = "WEATHER_LISTEN_ADDR")]
    pub listen: String,

    /// Path to the NetCDF dataset
    #[arg(long, default_value = "public/weather_data.nc", env = "WEATHER_DATA_FILE")]
    pub data_file: PathBuf,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Number of worker threads
    #[arg(long, env = "WEATHER_WORKER_THREADS")]
    pub worker_threads: Option<usize>,

    /// Decimal places kept when rendering values
    #[arg(long, default_value_t = 6, env = "WEATHER_VALUE_PRECISION")]
    pub value_precision: usize,
}

impl Args {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .with_context(|| format!("Invalid listen address: {}", self.listen))
    }

    /// Engine configuration: environment overrides, then command-line flags.
    pub fn query_config(&self) -> QueryConfig {
        QueryConfig {
            value_precision: self.value_precision,
            ..QueryConfig::from_env()
        }
    }
}
