//! Artifact loader for the classifier and the age scaler

use crate::error::ArtifactError;
use crate::models::classifier::{Classifier, ClassifierArtifact};
use crate::models::scaler::AgeScaler;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::info;

/// Loader for serialized model artifacts
pub struct ArtifactLoader {
    /// Number of threads for ONNX inference
    #[cfg_attr(not(feature = "onnx"), allow(dead_code))]
    onnx_threads: usize,
}

impl ArtifactLoader {
    /// Create a new loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a new loader with specified number of ONNX threads
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load the classifier, dispatching on the file extension.
    pub fn load_classifier<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Box<dyn Classifier>, ArtifactError> {
        let path = path.as_ref();
        ensure_exists("classifier", path)?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => {
                let artifact: ClassifierArtifact = read_json(path)?;
                artifact.check().map_err(|reason| ArtifactError::Invalid {
                    path: path.to_path_buf(),
                    reason,
                })?;
                let classifier = artifact.into_classifier();
                info!(
                    model = classifier.name(),
                    path = %path.display(),
                    "Classifier loaded"
                );
                Ok(classifier)
            }
            #[cfg(feature = "onnx")]
            Some("onnx") => {
                let classifier =
                    crate::models::onnx::OnnxClassifier::load(path, self.onnx_threads)?;
                Ok(Box::new(classifier))
            }
            _ => Err(ArtifactError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Load the age scaler.
    pub fn load_scaler<P: AsRef<Path>>(&self, path: P) -> Result<AgeScaler, ArtifactError> {
        let path = path.as_ref();
        ensure_exists("scaler", path)?;

        let scaler: AgeScaler = read_json(path)?;
        scaler.check().map_err(|reason| ArtifactError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        info!(scaler = ?scaler, path = %path.display(), "Scaler loaded");
        Ok(scaler)
    }
}

impl Default for ArtifactLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_exists(kind: &'static str, path: &Path) -> Result<(), ArtifactError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ArtifactError::Missing {
            kind,
            path: path.to_path_buf(),
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
