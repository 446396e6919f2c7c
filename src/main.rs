//! Stroke Risk Prediction API - Main Entry Point
//!
//! Loads the classifier and age scaler, then serves `POST /predict`.
//! Missing or invalid artifacts abort startup.

use anyhow::{Context, Result};
use std::sync::Arc;
use stroke_risk_service::{
    api::{self, AppState},
    config::AppConfig,
    metrics::MetricsReporter,
    models::inference::InferenceEngine,
    server, telemetry,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    telemetry::init_tracing(&config.logging)?;

    info!("Starting Stroke Risk Prediction API");

    let engine = InferenceEngine::new(&config.artifacts)
        .context("Artifacts not found or invalid. Export the trained model and scaler first.")?;
    info!(model = engine.model_name(), "Model and scaler loaded successfully");

    let state = AppState::new(Arc::new(engine));
    let metrics = state.metrics.clone();

    if config.metrics.report_interval_secs > 0 {
        let reporter = MetricsReporter::new(metrics.clone(), config.metrics.report_interval_secs);
        tokio::spawn(reporter.start());
    }

    server::serve(&config.server.bind_addr(), api::router(state)).await?;

    info!("Prediction API shutting down...");
    metrics.print_summary();

    Ok(())
}
