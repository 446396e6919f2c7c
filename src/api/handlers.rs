//! Request handlers for the prediction API

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::error::PredictError;
use crate::metrics::MetricsSnapshot;
use crate::types::patient::PatientData;
use crate::types::prediction::PredictionResponse;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct HomeResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub artifacts_loaded: bool,
}

/// GET /
pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        message: "Stroke Risk Prediction API is running. Use /predict to get a prediction."
            .to_string(),
    })
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        artifacts_loaded: state.engine.is_some(),
    })
}

/// GET /metrics
pub async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

/// POST /predict
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PatientData>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let start_time = Instant::now();

    let Json(patient) = payload.map_err(|rejection| {
        state.metrics.record_rejection();
        warn!(request_id = %request_id, error = %rejection.body_text(), "Rejected request body");
        ApiError::from(rejection)
    })?;

    let Some(engine) = state.engine.as_ref() else {
        state.metrics.record_failure();
        error!(request_id = %request_id, "Prediction requested but artifacts are not loaded");
        return Err(PredictError::NotLoaded.into());
    };

    match engine.assess(&patient) {
        Ok(assessment) => {
            let processing_time = start_time.elapsed();
            state.metrics.record_prediction(processing_time, &assessment);
            info!(
                request_id = %request_id,
                prediction = %assessment.label,
                risk_probability = assessment.probability,
                processing_time_us = processing_time.as_micros(),
                "Prediction served"
            );
            Ok(Json(PredictionResponse::new(assessment, patient)))
        }
        Err(PredictError::Invalid(e)) => {
            state.metrics.record_rejection();
            warn!(request_id = %request_id, error = %e, "Rejected patient data");
            Err(PredictError::Invalid(e).into())
        }
        Err(e) => {
            state.metrics.record_failure();
            error!(request_id = %request_id, error = %e, "Inference failed");
            Err(e.into())
        }
    }
}
