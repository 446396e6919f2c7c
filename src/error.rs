//! Error types for artifact loading, input validation and inference

use std::path::PathBuf;
use thiserror::Error;

/// Failure to load the classifier or the scaler.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("{kind} artifact not found at {}", path.display())]
    Missing { kind: &'static str, path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid artifact {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error("unsupported artifact format for {} (enable the `onnx` feature for .onnx models)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[cfg(feature = "onnx")]
    #[error("failed to load ONNX model {}: {source}", path.display())]
    Onnx {
        path: PathBuf,
        #[source]
        source: ort::Error,
    },
}

/// Input rejected before it reaches the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("{field} must be a whole number, got {value:?}")]
    NotAnInteger { field: &'static str, value: String },
}

/// Failure of a single prediction.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Model not loaded.")]
    NotLoaded,

    #[error("inference failed: {0}")]
    Inference(String),
}
