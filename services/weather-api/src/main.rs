//! Weather API Server
//!
//! Serves point/time queries against a gridded NetCDF dataset.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use weather_api::config::Args;
use weather_api::state::AppState;

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!(
        data_file = %args.data_file.display(),
        worker_threads = ?args.worker_threads,
        "Starting weather API server"
    );

    let state = AppState::new(args.data_file.clone(), args.query_config())
        .context("Failed to initialize application state")?
        .with_prometheus(prometheus_handle);

    // Metadata is cached up front; a missing dataset is reported per request.
    let state = Arc::new(state);
    let warm = Arc::clone(&state);
    tokio::task::spawn_blocking(move || warm.warm_up()).await?;

    let app = weather_api::app(state);

    let addr = args.listen_addr()?;
    info!(address = %addr, "Weather API listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
