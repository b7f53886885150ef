//! XRP prediction server
//!
//! Loads the models once, then serves the HTTP API until Ctrl+C.
//!
//! # Usage
//! ```sh
//! MODEL_PATH=models/forest.json PORT=8000 cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `MODEL_PATH` - Tabular model artifact, required to start (default: models/xrp_xgb_model.joblib)
//! - `ARIMA_PATH` - Optional ARIMA state (default: models/arima_xrp.pkl)
//! - `MODEL_VERSION` - Version reported by `GET /` (default: v1.0)
//! - `HOST` / `PORT` - Listener address (default: 0.0.0.0:8000)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, debug, error, info};
use tracing_subscriber::prelude::*;
use xrp_predictor::application::ml::{load_optional, load_required};
use xrp_predictor::application::router::PredictionRouter;
use xrp_predictor::config::Config;
use xrp_predictor::domain::ml::{SequentialForecaster, TabularPredictor};
use xrp_predictor::infrastructure::observability::Metrics;
use xrp_predictor::interfaces::http::{APP_TITLE, AppState, ServiceInfo, build_router};

#[derive(Parser)]
#[command(author, version, about = "XRP next-day high prediction server", long_about = None)]
struct Cli {
    /// Tabular model artifact (overrides MODEL_PATH)
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// ARIMA state artifact (overrides ARIMA_PATH)
    #[arg(long)]
    arima_path: Option<PathBuf>,

    /// Bind host (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("{} {} starting...", APP_TITLE, env!("CARGO_PKG_VERSION"));

    let mut config = Config::from_env()?;
    if let Some(model_path) = cli.model_path {
        config.model_path = model_path;
    }
    if let Some(arima_path) = cli.arima_path {
        config.arima_path = arima_path;
    }
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    info!(
        "Configuration loaded: model={:?}, arima={:?}, version={}",
        config.model_path, config.arima_path, config.model_version
    );

    // Startup phase: the tabular model is mandatory
    let tabular = load_required(&config.model_path).with_context(|| {
        format!(
            "Failed to load required tabular model from {:?}",
            config.model_path
        )
    })?;
    info!("Tabular model: {} ({:?})", tabular.name(), tabular.model_path());

    let sequential = load_optional(&config.arima_path).map(|forecaster| {
        info!(
            "Sequential forecaster: {} ({:?})",
            forecaster.name(),
            forecaster.model_path()
        );
        Arc::new(forecaster) as Arc<dyn SequentialForecaster>
    });
    info!(
        "Models ready (sequential forecaster: {})",
        if sequential.is_some() { "loaded" } else { "absent" }
    );

    let metrics = Metrics::new()?;
    let router = PredictionRouter::new(Arc::new(tabular), sequential, metrics.clone());
    let app = build_router(AppState::new(router, ServiceInfo::from_config(&config)));

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(
        "Prediction summary: {}",
        serde_json::to_string(&metrics.summary())?
    );
    match metrics.render() {
        Ok(text) => debug!("Final metrics:\n{}", text),
        Err(e) => error!("Failed to render metrics: {}", e),
    }
    info!("Shutdown complete.");

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received. Draining connections..."),
        Err(e) => {
            // Without a signal handler, keep serving until the process is killed
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
