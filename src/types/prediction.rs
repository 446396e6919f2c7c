//! Prediction outcome types

use crate::types::patient::PatientData;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary decision emitted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    #[serde(rename = "At Risk")]
    AtRisk,
    #[serde(rename = "Not At Risk")]
    NotAtRisk,
}

impl RiskLabel {
    /// Map a classifier class (1 = positive) to a label
    pub fn from_class(class: u8) -> Self {
        if class == 1 {
            RiskLabel::AtRisk
        } else {
            RiskLabel::NotAtRisk
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLabel::AtRisk => "At Risk",
            RiskLabel::NotAtRisk => "Not At Risk",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label and positive-class probability for one patient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAssessment {
    pub label: RiskLabel,
    /// Probability of the positive class (0.0 - 1.0)
    pub probability: f64,
}

impl RiskAssessment {
    /// Probability as a percentage (0.0 - 100.0)
    pub fn percentage(&self) -> f64 {
        self.probability * 100.0
    }

    pub fn is_at_risk(&self) -> bool {
        self.label == RiskLabel::AtRisk
    }
}

/// Body returned by `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: RiskLabel,
    pub risk_probability: f64,
    pub input_summary: PatientData,
}

impl PredictionResponse {
    pub fn new(assessment: RiskAssessment, input: PatientData) -> Self {
        Self {
            prediction: assessment.label,
            risk_probability: assessment.probability,
            input_summary: input,
        }
    }

    pub fn assessment(&self) -> RiskAssessment {
        RiskAssessment {
            label: self.prediction,
            probability: self.risk_probability,
        }
    }
}
