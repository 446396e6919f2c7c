//! Feature extraction for stroke risk model inference.
//!
//! Builds the fixed-order feature record the classifier was trained on.
//! Only the age column is rescaled; indicators pass through unchanged.

use crate::types::feature::{Feature, FEATURE_COUNT};
use crate::types::patient::PatientData;
use std::ops::Index;

/// Model input vector in training column order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRecord([f64; FEATURE_COUNT]);

impl FeatureRecord {
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn set(&mut self, feature: Feature, value: f64) {
        self.0[feature.index()] = value;
    }

    /// Values narrowed to `f32` for runtimes that take single-precision input.
    pub fn to_f32(&self) -> Vec<f32> {
        self.0.iter().map(|&v| v as f32).collect()
    }
}

impl Index<Feature> for FeatureRecord {
    type Output = f64;

    fn index(&self, feature: Feature) -> &f64 {
        &self.0[feature.index()]
    }
}

/// Feature extractor that turns patient input into model input features.
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract the raw (unscaled) feature record for a patient.
    pub fn extract(&self, patient: &PatientData) -> FeatureRecord {
        let mut values = [0.0; FEATURE_COUNT];
        for feature in Feature::ALL {
            values[feature.index()] = patient.get(feature) as f64;
        }
        FeatureRecord(values)
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// Get feature names in training order.
    pub fn feature_names(&self) -> Vec<&'static str> {
        Feature::column_names()
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_extraction() {
        let extractor = FeatureExtractor::new();
        let patient = PatientData::new(70)
            .with(Feature::ChestPain, 1)
            .with(Feature::AnxietyFeelingOfDoom, 1);

        let record = extractor.extract(&patient);

        assert_eq!(record.as_slice().len(), extractor.feature_count());
        assert_eq!(record.as_slice()[0], 1.0); // chest pain
        assert_eq!(record.as_slice()[14], 1.0); // anxiety
        assert_eq!(record.as_slice()[15], 70.0); // age
        assert_eq!(record.as_slice().iter().filter(|&&v| v == 1.0).count(), 2);
    }

    #[test]
    fn test_feature_count() {
        let extractor = FeatureExtractor::new();
        assert_eq!(extractor.feature_count(), 16);
        assert_eq!(extractor.feature_names().len(), 16);
        assert_eq!(extractor.feature_names()[15], "Age");
    }

    #[test]
    fn test_set_replaces_single_column() {
        let mut record = FeatureExtractor::new().extract(&PatientData::new(45));
        record.set(Feature::Age, 0.25);
        assert_eq!(record[Feature::Age], 0.25);
        assert_eq!(record[Feature::ChestPain], 0.0);
        assert_eq!(record.to_f32()[15], 0.25_f32);
    }
}
