//! Type definitions for the stroke risk service

pub mod feature;
pub mod patient;
pub mod prediction;

pub use feature::{Feature, FormSection, FEATURE_COUNT};
pub use patient::PatientData;
pub use prediction::{PredictionResponse, RiskAssessment, RiskLabel};
