//! Stroke Risk Service Library
//!
//! Serves a pre-trained stroke risk classifier through a REST API and two
//! HTML form front-ends (one running the model in-process, one calling the
//! API).

pub mod api;
pub mod config;
pub mod error;
pub mod feature_extractor;
pub mod metrics;
pub mod models;
pub mod server;
pub mod telemetry;
pub mod types;
pub mod ui;

pub use config::AppConfig;
pub use error::{ArtifactError, PredictError, ValidationError};
pub use feature_extractor::{FeatureExtractor, FeatureRecord};
pub use models::inference::InferenceEngine;
pub use types::{Feature, PatientData, PredictionResponse, RiskAssessment, RiskLabel};
