//! REST API serving stroke risk predictions

pub mod error;
pub mod handlers;

use crate::metrics::ServiceMetrics;
use crate::models::inference::InferenceEngine;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ErrorBody};
pub use handlers::{HealthResponse, HomeResponse};

/// Shared handler state.
///
/// `engine` is `None` only when the service was deliberately started
/// without artifacts; every prediction then fails with 500.
#[derive(Clone)]
pub struct AppState {
    pub engine: Option<Arc<InferenceEngine>>,
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    pub fn new(engine: Arc<InferenceEngine>) -> Self {
        Self {
            engine: Some(engine),
            metrics: Arc::new(ServiceMetrics::new()),
        }
    }

    /// State with no artifacts loaded
    pub fn unloaded() -> Self {
        Self {
            engine: None,
            metrics: Arc::new(ServiceMetrics::new()),
        }
    }
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/predict", post(handlers::predict))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
