//! Stroke risk inference over a loaded artifact bundle

use crate::config::ArtifactsConfig;
use crate::error::{ArtifactError, PredictError};
use crate::feature_extractor::{FeatureExtractor, FeatureRecord};
use crate::models::classifier::Classifier;
use crate::models::loader::ArtifactLoader;
use crate::models::scaler::AgeScaler;
use crate::types::feature::Feature;
use crate::types::patient::PatientData;
use crate::types::prediction::{RiskAssessment, RiskLabel};
use tracing::{debug, info};

/// Immutable bundle of the classifier and the age scaler.
///
/// Built once at startup and shared read-only (behind `Arc`) by every
/// request.
pub struct InferenceEngine {
    classifier: Box<dyn Classifier>,
    scaler: AgeScaler,
    extractor: FeatureExtractor,
}

impl InferenceEngine {
    /// Load both artifacts from the configured paths
    pub fn new(config: &ArtifactsConfig) -> Result<Self, ArtifactError> {
        let loader = ArtifactLoader::with_threads(config.onnx_threads);
        let classifier = loader.load_classifier(&config.model_path)?;
        let scaler = loader.load_scaler(&config.scaler_path)?;

        info!(
            model = classifier.name(),
            model_path = %config.model_path,
            scaler_path = %config.scaler_path,
            "Inference engine initialized"
        );

        Ok(Self::from_parts(classifier, scaler))
    }

    /// Build an engine from already constructed artifacts
    pub fn from_parts(classifier: Box<dyn Classifier>, scaler: AgeScaler) -> Self {
        Self {
            classifier,
            scaler,
            extractor: FeatureExtractor::new(),
        }
    }

    pub fn model_name(&self) -> &str {
        self.classifier.name()
    }

    /// Validated, fixed-order record with the age column scaled.
    pub fn prepare(&self, patient: &PatientData) -> Result<FeatureRecord, PredictError> {
        patient.validate()?;
        let mut record = self.extractor.extract(patient);
        record.set(Feature::Age, self.scaler.transform(record[Feature::Age]));
        Ok(record)
    }

    /// Run the classifier on an already prepared record
    pub fn assess_record(&self, record: &FeatureRecord) -> Result<RiskAssessment, PredictError> {
        let (class, [_, probability]) = self.classifier.classify(record)?;
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(PredictError::Inference(format!(
                "classifier returned probability {probability} outside [0, 1]"
            )));
        }
        let label = RiskLabel::from_class(class);

        Ok(RiskAssessment { label, probability })
    }

    /// Validate, scale and classify one patient
    pub fn assess(&self, patient: &PatientData) -> Result<RiskAssessment, PredictError> {
        let record = self.prepare(patient)?;
        let assessment = self.assess_record(&record)?;

        debug!(
            model = self.classifier.name(),
            scaled_age = record[Feature::Age],
            risk_probability = assessment.probability,
            prediction = %assessment.label,
            "Inference complete"
        );

        Ok(assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::models::classifier::LogisticRegression;
    use crate::types::feature::FEATURE_COUNT;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn engine() -> InferenceEngine {
        let mut coefficients = vec![0.3; FEATURE_COUNT];
        coefficients[Feature::Age.index()] = 1.5;
        InferenceEngine::from_parts(
            Box::new(LogisticRegression {
                feature_names: None,
                coefficients,
                intercept: -1.0,
            }),
            AgeScaler::Standard {
                mean: 50.0,
                scale: 20.0,
            },
        )
    }

    #[test]
    fn test_only_age_is_scaled() {
        let patient = PatientData::new(70).with(Feature::Dizziness, 1);
        let record = engine().prepare(&patient).unwrap();

        assert_eq!(record[Feature::Age], 1.0);
        assert_eq!(record[Feature::Dizziness], 1.0);
        assert_eq!(record[Feature::ChestPain], 0.0);
    }

    #[test]
    fn test_label_matches_half_threshold() {
        let engine = engine();
        for age in [0, 20, 45, 50, 63, 90, 120] {
            for symptoms in 0..=3 {
                let mut patient = PatientData::new(age);
                for feature in Feature::indicators().take(symptoms) {
                    patient = patient.with(feature, 1);
                }
                let result = engine.assess(&patient).unwrap();
                assert!((0.0..=1.0).contains(&result.probability));
                assert_eq!(result.is_at_risk(), result.probability > 0.5);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let engine = engine();
        let patient = PatientData::new(58).with(Feature::HighBloodPressure, 1);
        let first = engine.assess(&patient).unwrap();
        for _ in 0..10 {
            let again = engine.assess(&patient).unwrap();
            assert_eq!(again.label, first.label);
            assert_eq!(again.probability.to_bits(), first.probability.to_bits());
        }
    }

    /// Records every call so the test can tell whether inference ran.
    struct CountingClassifier(Arc<AtomicUsize>);

    impl Classifier for CountingClassifier {
        fn name(&self) -> &str {
            "counting"
        }

        fn predict_proba(&self, _: &FeatureRecord) -> Result<[f64; 2], PredictError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok([0.5, 0.5])
        }

        fn predict(&self, _: &FeatureRecord) -> Result<u8, PredictError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(0)
        }
    }

    #[test]
    fn test_invalid_input_never_reaches_classifier() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = InferenceEngine::from_parts(
            Box::new(CountingClassifier(calls.clone())),
            AgeScaler::Standard {
                mean: 0.0,
                scale: 1.0,
            },
        );

        for patient in [
            PatientData::new(121),
            PatientData::new(-1),
            PatientData::new(30).with(Feature::Dizziness, 2),
        ] {
            let err = engine.assess(&patient).unwrap_err();
            assert!(matches!(
                err,
                PredictError::Invalid(ValidationError::OutOfRange { .. })
            ));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        engine.assess(&PatientData::new(30)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    struct BrokenClassifier;

    impl Classifier for BrokenClassifier {
        fn name(&self) -> &str {
            "broken"
        }

        fn predict_proba(&self, _: &FeatureRecord) -> Result<[f64; 2], PredictError> {
            Ok([0.0, f64::NAN])
        }

        fn predict(&self, _: &FeatureRecord) -> Result<u8, PredictError> {
            Ok(1)
        }
    }

    #[test]
    fn test_non_finite_probability_is_an_inference_error() {
        let engine = InferenceEngine::from_parts(
            Box::new(BrokenClassifier),
            AgeScaler::Standard {
                mean: 0.0,
                scale: 1.0,
            },
        );
        let err = engine.assess(&PatientData::new(40)).unwrap_err();
        assert!(matches!(err, PredictError::Inference(_)));
    }

    /// Only answers through `classify`.
    struct SinglePassClassifier;

    impl Classifier for SinglePassClassifier {
        fn name(&self) -> &str {
            "single_pass"
        }

        fn predict_proba(&self, _: &FeatureRecord) -> Result<[f64; 2], PredictError> {
            Err(PredictError::Inference("separate probability call".into()))
        }

        fn predict(&self, _: &FeatureRecord) -> Result<u8, PredictError> {
            Err(PredictError::Inference("separate label call".into()))
        }

        fn classify(&self, _: &FeatureRecord) -> Result<(u8, [f64; 2]), PredictError> {
            Ok((1, [0.3, 0.7]))
        }
    }

    #[test]
    fn test_engine_classifies_in_one_call() {
        let engine = InferenceEngine::from_parts(
            Box::new(SinglePassClassifier),
            AgeScaler::Standard {
                mean: 0.0,
                scale: 1.0,
            },
        );
        let result = engine.assess(&PatientData::new(40)).unwrap();
        assert_eq!(result.label, RiskLabel::AtRisk);
        assert_eq!(result.probability, 0.7);
    }
}
