//! Common test utilities for integration tests.

#![allow(dead_code)]

use axum::Router;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stroke_risk_service::config::ArtifactsConfig;
use stroke_risk_service::InferenceEngine;
use tokio::net::TcpListener;

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn artifacts_config(model: &str, scaler: &str) -> ArtifactsConfig {
    ArtifactsConfig {
        model_path: fixture(model).display().to_string(),
        scaler_path: fixture(scaler).display().to_string(),
        onnx_threads: 1,
    }
}

/// Logistic reference model with the standard age scaler.
pub fn reference_config() -> ArtifactsConfig {
    artifacts_config("reference_model.json", "reference_scaler.json")
}

pub fn reference_engine() -> Arc<InferenceEngine> {
    Arc::new(InferenceEngine::new(&reference_config()).expect("reference artifacts load"))
}

/// Serve `app` on an ephemeral local port.
pub async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });
    addr
}

/// An address with nothing listening on it.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    addr
}
