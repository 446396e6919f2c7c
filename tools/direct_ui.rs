//! Direct-load form front-end
//!
//! Loads the model artifacts into this process and evaluates submissions
//! locally. If the artifacts cannot be loaded the form is still served,
//! with the error shown and prediction disabled.

use anyhow::Result;
use stroke_risk_service::{
    config::AppConfig,
    server, telemetry,
    ui::{self, Backend, UiState},
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    telemetry::init_tracing(&config.logging)?;

    let backend = Backend::direct(&config.artifacts);
    info!(
        prediction_enabled = backend.prediction_enabled(),
        "Starting direct-load stroke risk form"
    );

    let addr = format!("{}:{}", config.ui.host, config.ui.direct_port);
    server::serve(&addr, ui::router(UiState::new(backend))).await
}
