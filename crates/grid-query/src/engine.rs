//! The query orchestrator.
//!
//! ```text
//! validate ─► acquire ─► filter ─► resolve ─► extract ─► release
//!   (no I/O)   (lock +                                  (lease drop,
//!               open)                                    every path)
//! ```

use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{debug, error, info, warn};

use crate::config::QueryConfig;
use crate::error::{QueryError, Result};
use crate::extract::extract;
use crate::filter::filter;
use crate::format::ValueFormat;
use crate::manager::DatasetManager;
use crate::resolve::resolve_nearest;
use crate::source::DatasetOpener;
use crate::types::{DatasetMetadata, QueryParams, QueryRequest, QueryResult, ResultMetadata};
use crate::validate::validate;

/// Answers point/time queries against one dataset.
pub struct QueryEngine<O> {
    manager: DatasetManager<O>,
    config: QueryConfig,
    format: ValueFormat,
}

impl<O: DatasetOpener> QueryEngine<O> {
    pub fn new(opener: O, config: QueryConfig) -> Result<Self> {
        config.validate()?;
        let format = ValueFormat::from(&config);
        Ok(Self {
            manager: DatasetManager::new(opener),
            config,
            format,
        })
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// How result values should be rendered as text.
    pub fn value_format(&self) -> &ValueFormat {
        &self.format
    }

    pub fn manager(&self) -> &DatasetManager<O> {
        &self.manager
    }

    /// Answer one query.
    ///
    /// Validation failures return [`QueryError::Rejected`] without opening
    /// the dataset. The handle is always released before this returns.
    pub fn query(&self, params: &QueryParams) -> Result<QueryResult> {
        let started = Instant::now();
        let outcome = validate(params)
            .map_err(QueryError::from)
            .and_then(|request| self.run(&request));

        histogram!("weather_query_duration_seconds").record(started.elapsed().as_secs_f64());
        match &outcome {
            Ok(result) => {
                counter!("weather_queries_total", "outcome" => "ok").increment(1);
                debug!(
                    variable = %result.metadata.variable,
                    count = result.metadata.count,
                    grid_latitude = result.metadata.grid_latitude,
                    grid_longitude = result.metadata.grid_longitude,
                    "Query answered"
                );
            }
            Err(e) => {
                counter!("weather_queries_total", "outcome" => e.kind()).increment(1);
                if e.is_rejection() {
                    warn!(reason = %e, "Query rejected");
                } else {
                    error!(error = %e, "Query failed");
                }
            }
        }
        outcome
    }

    /// Convenience wrapper taking the five parameters directly.
    pub fn query_point(
        &self,
        start_time: i64,
        end_time: i64,
        lat: f64,
        lon: f64,
        variable: &str,
    ) -> Result<QueryResult> {
        self.query(&QueryParams::new(start_time, end_time, lat, lon, variable))
    }

    fn run(&self, request: &QueryRequest) -> Result<QueryResult> {
        let lease = self.manager.acquire()?;

        let view = filter(&*lease, &request.window);
        if view.is_empty() {
            debug!(
                start = request.start_timestamp,
                end = request.end_timestamp,
                "Window does not intersect dataset coverage"
            );
        }

        let point = resolve_nearest(&*lease, request.latitude, request.longitude)?;
        let data = extract(&view, &point, request.variable, &self.config.fields);
        self.manager.release(lease);

        Ok(QueryResult {
            metadata: ResultMetadata {
                latitude: request.latitude,
                longitude: request.longitude,
                variable: request.variable,
                start_timestamp: request.start_timestamp,
                end_timestamp: request.end_timestamp,
                count: data.len(),
                grid_latitude: point.latitude,
                grid_longitude: point.longitude,
            },
            data,
        })
    }

    /// Dataset metadata, computed on first use and cached afterwards.
    pub fn metadata(&self) -> Result<&DatasetMetadata> {
        self.manager.metadata()
    }

    /// Compute the metadata cache ahead of the first request.
    pub fn warm_up(&self) -> Result<()> {
        let metadata = self.metadata()?;
        info!(
            dataset = %self.manager.opener().describe(),
            variables = ?metadata.variables,
            times = metadata.dimensions.time,
            "Dataset metadata cached"
        );
        Ok(())
    }
}
