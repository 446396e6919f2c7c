//! Remote-call form front-end
//!
//! Sends each submission to the prediction API and renders its answer.

use anyhow::{Context, Result};
use stroke_risk_service::{
    config::AppConfig,
    server, telemetry,
    ui::{self, remote::RemoteClient, Backend, UiState},
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    telemetry::init_tracing(&config.logging)?;

    let client = RemoteClient::new(config.ui.api_url.clone(), config.ui.request_timeout())
        .context("Failed to build HTTP client")?;
    info!(
        api_url = %config.ui.api_url,
        timeout_ms = config.ui.request_timeout_ms,
        "Starting remote-call stroke risk form"
    );

    let addr = format!("{}:{}", config.ui.host, config.ui.remote_port);
    server::serve(&addr, ui::router(UiState::new(Backend::remote(client)))).await
}
