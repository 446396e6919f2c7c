//! ONNX Runtime classifier backend

use crate::error::{ArtifactError, PredictError};
use crate::feature_extractor::FeatureRecord;
use crate::models::classifier::Classifier;
use ort::memory::Allocator;
use ort::session::{builder::GraphOptimizationLevel, Session, SessionOutputs};
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, DynValue, Tensor};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Classifier exported to ONNX (e.g. via skl2onnx).
pub struct OnnxClassifier {
    /// Sessions need exclusive access per run
    session: Mutex<Session>,
    input_name: String,
    label_name: Option<String>,
    probability_name: String,
}

impl OnnxClassifier {
    /// Load a model file with the given number of intra-op threads.
    pub fn load(path: &Path, threads: usize) -> Result<Self, ArtifactError> {
        let onnx_err = |source| ArtifactError::Onnx {
            path: path.to_path_buf(),
            source,
        };

        info!(path = %path.display(), threads, "Loading ONNX model");

        let session = Session::builder()
            .map_err(onnx_err)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(onnx_err)?
            .with_intra_threads(threads)
            .map_err(onnx_err)?
            .commit_from_file(path)
            .map_err(onnx_err)?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let label_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .map(|o| o.name.clone());

        let probability_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "probabilities".to_string());

        info!(
            input = %input_name,
            label = ?label_name,
            probabilities = %probability_name,
            "ONNX model loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            label_name,
            probability_name,
        })
    }

    /// Run the session once and hand its outputs to `read`.
    fn run<T>(
        &self,
        features: &FeatureRecord,
        read: impl FnOnce(&SessionOutputs<'_>) -> Result<T, PredictError>,
    ) -> Result<T, PredictError> {
        let values = features.to_f32();
        let shape = vec![1_i64, values.len() as i64];
        let input = Tensor::from_array((shape, values))
            .map_err(|e| PredictError::Inference(format!("failed to create input tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| PredictError::Inference(format!("lock error: {e}")))?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(|e| PredictError::Inference(e.to_string()))?;
        read(&outputs)
    }

    fn read_probability(&self, outputs: &SessionOutputs<'_>) -> Result<f64, PredictError> {
        let output = outputs.get(self.probability_name.as_str()).ok_or_else(|| {
            PredictError::Inference(format!("missing output {}", self.probability_name))
        })?;

        // Tensor layout [batch, classes]
        if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
            let prob = positive_from_tensor(shape, data)?;
            debug!(prob, "Extracted probability from tensor");
            return Ok(prob);
        }

        // ZipMap layout seq(map(int64, float))
        let dtype = output.dtype();
        if DynSequenceValueType::can_downcast(&dtype) {
            return positive_from_sequence_map(output);
        }

        Err(PredictError::Inference(format!(
            "unsupported probability output type {dtype:?}"
        )))
    }

    /// Exported label, or argmax over the probabilities when there is none.
    fn read_label(
        &self,
        outputs: &SessionOutputs<'_>,
        probability: f64,
    ) -> Result<u8, PredictError> {
        let Some(output) = self.label_name.as_deref().and_then(|n| outputs.get(n)) else {
            return Ok(u8::from(probability > 0.5));
        };
        let (_, labels) = output
            .try_extract_tensor::<i64>()
            .map_err(|e| PredictError::Inference(e.to_string()))?;
        let label = labels
            .first()
            .ok_or_else(|| PredictError::Inference("empty label output".to_string()))?;
        Ok(u8::from(*label == 1))
    }
}

fn positive_from_tensor(shape: &ort::tensor::Shape, data: &[f32]) -> Result<f64, PredictError> {
    let classes = shape.last().copied().unwrap_or(0);
    let value = match classes {
        c if c >= 2 => data.get(1),
        1 => data.first(),
        _ => None,
    };
    value
        .map(|p| *p as f64)
        .ok_or_else(|| PredictError::Inference(format!("unexpected probability shape {shape:?}")))
}

fn positive_from_sequence_map(output: &DynValue) -> Result<f64, PredictError> {
    let allocator = Allocator::default();
    let sequence = output
        .downcast_ref::<DynSequenceValueType>()
        .map_err(|e| PredictError::Inference(format!("failed to downcast to sequence: {e}")))?;
    let maps = sequence
        .try_extract_sequence::<DynMapValueType>(&allocator)
        .map_err(|e| PredictError::Inference(e.to_string()))?;
    let first = maps
        .first()
        .ok_or_else(|| PredictError::Inference("empty probability sequence".to_string()))?;
    let pairs = first
        .try_extract_key_values::<i64, f32>()
        .map_err(|e| PredictError::Inference(e.to_string()))?;

    if let Some((_, p)) = pairs.iter().find(|(class, _)| *class == 1) {
        return Ok(*p as f64);
    }
    if let Some((_, p)) = pairs.iter().find(|(class, _)| *class == 0) {
        return Ok(1.0 - *p as f64);
    }
    Err(PredictError::Inference("no class probability in map".to_string()))
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        "onnx"
    }

    fn predict_proba(&self, features: &FeatureRecord) -> Result<[f64; 2], PredictError> {
        let p = self.run(features, |outputs| self.read_probability(outputs))?;
        Ok([1.0 - p, p])
    }

    fn predict(&self, features: &FeatureRecord) -> Result<u8, PredictError> {
        self.classify(features).map(|(class, _)| class)
    }

    fn classify(&self, features: &FeatureRecord) -> Result<(u8, [f64; 2]), PredictError> {
        self.run(features, |outputs| {
            let p = self.read_probability(outputs)?;
            Ok((self.read_label(outputs, p)?, [1.0 - p, p]))
        })
    }
}
