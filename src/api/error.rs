//! HTTP error responses for the prediction API

use crate::error::PredictError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Error body, `{"detail": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// Request body failed schema or range validation
    Unprocessable(String),
    /// Artifacts are not available
    ModelNotLoaded,
    /// Inference raised an error
    Inference(String),
    /// Body could not be read at all (wrong content type, too large)
    Rejected(StatusCode, String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ModelNotLoaded | ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Rejected(status, _) => *status,
        }
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::Invalid(e) => ApiError::Unprocessable(e.to_string()),
            PredictError::NotLoaded => ApiError::ModelNotLoaded,
            PredictError::Inference(reason) => ApiError::Inference(reason),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                ApiError::Unprocessable(rejection.body_text())
            }
            other => ApiError::Rejected(other.status(), other.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            ApiError::Unprocessable(detail) | ApiError::Rejected(_, detail) => detail,
            ApiError::ModelNotLoaded => PredictError::NotLoaded.to_string(),
            ApiError::Inference(reason) => format!("Prediction failed: {reason}"),
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}
