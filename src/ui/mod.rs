//! HTML form front-ends.
//!
//! Both variants render the same form and result boxes; they differ only
//! in the [`Backend`] that turns a patient record into an assessment:
//! the direct variant runs the artifacts in-process, the remote variant
//! calls the prediction API.

pub mod form;
pub mod remote;
pub mod render;

use crate::config::ArtifactsConfig;
use crate::error::{PredictError, ValidationError};
use crate::models::inference::InferenceEngine;
use crate::types::patient::PatientData;
use crate::types::prediction::RiskAssessment;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{Form, Router};
use form::FormState;
use remote::RemoteClient;
use render::Page;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Failure shown to the user instead of a result.
#[derive(Debug, Error)]
pub enum UiError {
    #[error("Model or Scaler is missing. Cannot perform prediction.")]
    ArtifactsMissing,

    #[error("Please check your answers: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("An error occurred during prediction: {0}")]
    Prediction(String),

    #[error("Error from API: {status} - {body}")]
    ApiStatus { status: u16, body: String },

    #[error("Could not connect to the prediction service at {url}. Make sure it is running (`cargo run --bin stroke-api`) and try again.")]
    Unreachable { url: String },

    #[error("The prediction service at {url} did not answer within {timeout_ms} ms. Make sure it is running (`cargo run --bin stroke-api`) and try again.")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("Unexpected response from the prediction service: {0}")]
    BadResponse(String),
}

/// Where form submissions are evaluated.
pub enum Backend {
    /// Artifacts loaded in this process; `load_error` is set when loading failed
    Direct {
        engine: Option<Arc<InferenceEngine>>,
        load_error: Option<String>,
    },
    /// Prediction API reached over HTTP
    Remote(RemoteClient),
}

impl Backend {
    /// Load artifacts for the direct variant.
    ///
    /// A load failure is kept for display rather than returned; the form
    /// stays up with prediction disabled.
    pub fn direct(config: &ArtifactsConfig) -> Self {
        match InferenceEngine::new(config) {
            Ok(engine) => Self::with_engine(Arc::new(engine)),
            Err(e) => {
                error!(error = %e, "Failed to load artifacts, prediction disabled");
                Backend::Direct {
                    engine: None,
                    load_error: Some(format!("Error loading artifacts: {e}")),
                }
            }
        }
    }

    pub fn with_engine(engine: Arc<InferenceEngine>) -> Self {
        Backend::Direct {
            engine: Some(engine),
            load_error: None,
        }
    }

    pub fn remote(client: RemoteClient) -> Self {
        Backend::Remote(client)
    }

    pub fn prediction_enabled(&self) -> bool {
        match self {
            Backend::Direct { engine, .. } => engine.is_some(),
            Backend::Remote(_) => true,
        }
    }

    fn banner(&self) -> Option<&str> {
        match self {
            Backend::Direct { load_error, .. } => load_error.as_deref(),
            Backend::Remote(_) => None,
        }
    }

    fn caption(&self) -> String {
        match self {
            Backend::Direct { .. } => "Predictions run locally against the loaded model.".to_string(),
            Backend::Remote(client) => format!("Predictions served by {}", client.url()),
        }
    }

    /// Evaluate one patient record.
    pub async fn assess(&self, patient: &PatientData) -> Result<RiskAssessment, UiError> {
        match self {
            Backend::Direct { engine: None, .. } => Err(UiError::ArtifactsMissing),
            Backend::Direct {
                engine: Some(engine),
                ..
            } => engine.assess(patient).map_err(|e| match e {
                PredictError::Invalid(e) => UiError::InvalidInput(e),
                PredictError::NotLoaded => UiError::ArtifactsMissing,
                PredictError::Inference(reason) => UiError::Prediction(reason),
            }),
            Backend::Remote(client) => client.predict(patient).await.map(|r| r.assessment()),
        }
    }
}

#[derive(Clone)]
pub struct UiState {
    pub backend: Arc<Backend>,
}

impl UiState {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    fn page(&self, form: &FormState, outcome: Option<&Result<RiskAssessment, UiError>>) -> String {
        let caption = self.backend.caption();
        render::render_page(&Page {
            caption: &caption,
            banner: self.backend.banner(),
            form,
            prediction_enabled: self.backend.prediction_enabled(),
            outcome,
        })
    }
}

/// GET / renders an empty form
async fn show_form(State(state): State<UiState>) -> Html<String> {
    Html(state.page(&FormState::default(), None))
}

/// POST / evaluates the submission and re-renders the form with the outcome
async fn submit_form(
    State(state): State<UiState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Html<String> {
    let form = FormState::from_fields(&fields);
    let outcome = match form.to_patient() {
        Ok(patient) => state.backend.assess(&patient).await,
        Err(e) => Err(UiError::InvalidInput(e)),
    };

    match &outcome {
        Ok(assessment) => info!(
            prediction = %assessment.label,
            risk_probability = assessment.probability,
            "Form assessed"
        ),
        Err(e) => warn!(error = %e, "Form submission failed"),
    }

    Html(state.page(&form, Some(&outcome)))
}

/// Build the form router
pub fn router(state: UiState) -> Router {
    Router::new()
        .route("/", get(show_form).post(submit_form))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
