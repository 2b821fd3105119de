//! Application state for the weather API.

use std::path::PathBuf;

use anyhow::Result;
use grid_query::{NetCdfOpener, QueryConfig, QueryEngine};
use metrics_exporter_prometheus::PrometheusHandle;

/// Shared application state.
pub struct AppState {
    /// Query engine over the configured dataset file.
    pub engine: QueryEngine<NetCdfOpener>,

    /// Renders `/metrics`; absent when no recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state for the dataset at `data_file`.
    ///
    /// The file is not opened here; see [`AppState::warm_up`].
    pub fn new(data_file: impl Into<PathBuf>, config: QueryConfig) -> Result<Self> {
        let engine = QueryEngine::new(NetCdfOpener::new(data_file), config)?;
        Ok(Self {
            engine,
            prometheus: None,
        })
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Fill the metadata cache. A failure is logged, not fatal.
    pub fn warm_up(&self) {
        if let Err(e) = self.engine.warm_up() {
            tracing::warn!(
                dataset = %self.engine.manager().opener().path().display(),
                error = %e,
                "Dataset metadata unavailable at startup"
            );
        }
    }
}
