//! Form state shared by both front-ends

use crate::error::ValidationError;
use crate::types::feature::Feature;
use crate::types::patient::{PatientData, MAX_AGE};
use std::collections::{BTreeSet, HashMap};

/// Lowest age the form accepts.
pub const FORM_MIN_AGE: i64 = 1;
/// Age pre-filled on a fresh form.
pub const FORM_DEFAULT_AGE: i64 = 30;

/// Values of one form submission.
///
/// Checkboxes are submitted under their API field name; an unchecked box
/// is simply absent from the submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub age: String,
    pub checked: BTreeSet<Feature>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            age: FORM_DEFAULT_AGE.to_string(),
            checked: BTreeSet::new(),
        }
    }
}

impl FormState {
    /// Read a decoded `application/x-www-form-urlencoded` body.
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let checked = Feature::indicators()
            .filter(|f| {
                fields
                    .get(f.api_name())
                    .is_some_and(|v| !matches!(v.as_str(), "0" | "off" | "false"))
            })
            .collect();

        Self {
            age: fields
                .get(Feature::Age.api_name())
                .map(|a| a.trim().to_string())
                .unwrap_or_default(),
            checked,
        }
    }

    pub fn is_checked(&self, feature: Feature) -> bool {
        self.checked.contains(&feature)
    }

    /// Build the patient record submitted to either backend.
    pub fn to_patient(&self) -> Result<PatientData, ValidationError> {
        let age: i64 = self
            .age
            .parse()
            .map_err(|_| ValidationError::NotAnInteger {
                field: Feature::Age.api_name(),
                value: self.age.clone(),
            })?;
        if !(FORM_MIN_AGE..=MAX_AGE).contains(&age) {
            return Err(ValidationError::OutOfRange {
                field: Feature::Age.api_name(),
                value: age,
                min: FORM_MIN_AGE,
                max: MAX_AGE,
            });
        }

        let patient = self
            .checked
            .iter()
            .fold(PatientData::new(age), |patient, &feature| patient.with(feature, 1));
        patient.validate()?;
        Ok(patient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_checked_boxes_become_indicators() {
        let form = FormState::from_fields(&fields(&[
            ("age", "70"),
            ("chest_pain", "on"),
            ("irregular_heartbeat", "on"),
        ]));
        let patient = form.to_patient().unwrap();

        assert_eq!(patient.age, 70);
        assert_eq!(patient.chest_pain, 1);
        assert_eq!(patient.irregular_heartbeat, 1);
        assert_eq!(patient.symptom_count(), 2);
    }

    #[test]
    fn test_every_indicator_is_reachable_from_the_form() {
        for feature in Feature::indicators() {
            let form = FormState::from_fields(&fields(&[("age", "40"), (feature.api_name(), "on")]));
            assert_eq!(form.to_patient().unwrap().get(feature), 1);
        }
    }

    #[test]
    fn test_unknown_and_off_fields_are_ignored() {
        let form = FormState::from_fields(&fields(&[
            ("age", " 55 "),
            ("dizziness", "off"),
            ("Chest Pain", "on"),
        ]));
        assert!(form.checked.is_empty());
        assert_eq!(form.to_patient().unwrap(), PatientData::new(55));
    }

    #[test]
    fn test_age_errors() {
        let form = FormState::from_fields(&fields(&[("age", "abc")]));
        assert!(matches!(
            form.to_patient(),
            Err(ValidationError::NotAnInteger { .. })
        ));

        let form = FormState::from_fields(&fields(&[("age", "0")]));
        assert!(matches!(
            form.to_patient(),
            Err(ValidationError::OutOfRange { min: 1, .. })
        ));

        let form = FormState::from_fields(&fields(&[("age", "121")]));
        assert!(form.to_patient().is_err());

        let form = FormState::from_fields(&fields(&[]));
        assert!(form.to_patient().is_err());
    }
}
