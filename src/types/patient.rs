//! Patient input accepted by the prediction endpoint

use crate::error::ValidationError;
use crate::types::feature::Feature;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Youngest accepted age in years.
pub const MIN_AGE: i64 = 0;
/// Oldest accepted age in years.
pub const MAX_AGE: i64 = 120;

/// Symptom indicators (0 = absent, 1 = present) and age of one patient.
///
/// Field names are the API field names from [`Feature::api_name`]; every
/// field is required. Integers written as whole floats (`70.0`) are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientData {
    #[serde(deserialize_with = "whole_number")]
    pub chest_pain: i64,
    #[serde(deserialize_with = "whole_number")]
    pub shortness_of_breath: i64,
    #[serde(deserialize_with = "whole_number")]
    pub irregular_heartbeat: i64,
    #[serde(deserialize_with = "whole_number")]
    pub fatigue_weakness: i64,
    #[serde(deserialize_with = "whole_number")]
    pub dizziness: i64,
    #[serde(deserialize_with = "whole_number")]
    pub swelling_edema: i64,
    #[serde(deserialize_with = "whole_number")]
    pub pain_neck_jaw_shoulder_back: i64,
    #[serde(deserialize_with = "whole_number")]
    pub excessive_sweating: i64,
    #[serde(deserialize_with = "whole_number")]
    pub persistent_cough: i64,
    #[serde(deserialize_with = "whole_number")]
    pub nausea_vomiting: i64,
    #[serde(deserialize_with = "whole_number")]
    pub high_blood_pressure: i64,
    #[serde(deserialize_with = "whole_number")]
    pub chest_discomfort_activity: i64,
    #[serde(deserialize_with = "whole_number")]
    pub cold_hands_feet: i64,
    #[serde(deserialize_with = "whole_number")]
    pub snoring_sleep_apnea: i64,
    #[serde(deserialize_with = "whole_number")]
    pub anxiety_feeling_of_doom: i64,
    /// Age in years
    #[serde(deserialize_with = "whole_number")]
    pub age: i64,
}

/// Integer field that also takes floats with no fractional part.
fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    struct WholeNumber;

    impl Visitor<'_> for WholeNumber {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
                Ok(v as i64)
            } else {
                Err(E::invalid_value(de::Unexpected::Float(v), &self))
            }
        }
    }

    deserializer.deserialize_any(WholeNumber)
}

impl PatientData {
    /// A patient of the given age with every indicator absent.
    pub fn new(age: i64) -> Self {
        Self {
            chest_pain: 0,
            shortness_of_breath: 0,
            irregular_heartbeat: 0,
            fatigue_weakness: 0,
            dizziness: 0,
            swelling_edema: 0,
            pain_neck_jaw_shoulder_back: 0,
            excessive_sweating: 0,
            persistent_cough: 0,
            nausea_vomiting: 0,
            high_blood_pressure: 0,
            chest_discomfort_activity: 0,
            cold_hands_feet: 0,
            snoring_sleep_apnea: 0,
            anxiety_feeling_of_doom: 0,
            age,
        }
    }

    /// Builder-style setter for one indicator.
    pub fn with(mut self, feature: Feature, value: i64) -> Self {
        *self.field_mut(feature) = value;
        self
    }

    /// Raw value of a column.
    pub fn get(&self, feature: Feature) -> i64 {
        match feature {
            Feature::ChestPain => self.chest_pain,
            Feature::ShortnessOfBreath => self.shortness_of_breath,
            Feature::IrregularHeartbeat => self.irregular_heartbeat,
            Feature::FatigueWeakness => self.fatigue_weakness,
            Feature::Dizziness => self.dizziness,
            Feature::SwellingEdema => self.swelling_edema,
            Feature::PainNeckJawShoulderBack => self.pain_neck_jaw_shoulder_back,
            Feature::ExcessiveSweating => self.excessive_sweating,
            Feature::PersistentCough => self.persistent_cough,
            Feature::NauseaVomiting => self.nausea_vomiting,
            Feature::HighBloodPressure => self.high_blood_pressure,
            Feature::ChestDiscomfortActivity => self.chest_discomfort_activity,
            Feature::ColdHandsFeet => self.cold_hands_feet,
            Feature::SnoringSleepApnea => self.snoring_sleep_apnea,
            Feature::AnxietyFeelingOfDoom => self.anxiety_feeling_of_doom,
            Feature::Age => self.age,
        }
    }

    fn field_mut(&mut self, feature: Feature) -> &mut i64 {
        match feature {
            Feature::ChestPain => &mut self.chest_pain,
            Feature::ShortnessOfBreath => &mut self.shortness_of_breath,
            Feature::IrregularHeartbeat => &mut self.irregular_heartbeat,
            Feature::FatigueWeakness => &mut self.fatigue_weakness,
            Feature::Dizziness => &mut self.dizziness,
            Feature::SwellingEdema => &mut self.swelling_edema,
            Feature::PainNeckJawShoulderBack => &mut self.pain_neck_jaw_shoulder_back,
            Feature::ExcessiveSweating => &mut self.excessive_sweating,
            Feature::PersistentCough => &mut self.persistent_cough,
            Feature::NauseaVomiting => &mut self.nausea_vomiting,
            Feature::HighBloodPressure => &mut self.high_blood_pressure,
            Feature::ChestDiscomfortActivity => &mut self.chest_discomfort_activity,
            Feature::ColdHandsFeet => &mut self.cold_hands_feet,
            Feature::SnoringSleepApnea => &mut self.snoring_sleep_apnea,
            Feature::AnxietyFeelingOfDoom => &mut self.anxiety_feeling_of_doom,
            Feature::Age => &mut self.age,
        }
    }

    /// Check indicators are 0/1 and age is within [`MIN_AGE`, `MAX_AGE`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        for feature in Feature::ALL {
            let (min, max) = if feature.is_indicator() {
                (0, 1)
            } else {
                (MIN_AGE, MAX_AGE)
            };
            let value = self.get(feature);
            if !(min..=max).contains(&value) {
                return Err(ValidationError::OutOfRange {
                    field: feature.api_name(),
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Number of indicators marked present.
    pub fn symptom_count(&self) -> usize {
        Feature::indicators().filter(|&f| self.get(f) == 1).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_keys_follow_schema() {
        let patient = PatientData::new(40);
        let value = serde_json::to_value(&patient).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), Feature::ALL.len());
        for feature in Feature::ALL {
            assert!(
                object.contains_key(feature.api_name()),
                "missing key {}",
                feature.api_name()
            );
        }
    }

    #[test]
    fn test_get_reads_the_matching_field() {
        for feature in Feature::indicators() {
            let patient = PatientData::new(50).with(feature, 1);
            assert_eq!(patient.get(feature), 1);
            assert_eq!(patient.symptom_count(), 1);

            let json = serde_json::to_value(&patient).unwrap();
            assert_eq!(json[feature.api_name()], 1);
        }
    }

    #[test]
    fn test_validate_age_bounds() {
        assert!(PatientData::new(0).validate().is_ok());
        assert!(PatientData::new(120).validate().is_ok());
        assert_eq!(
            PatientData::new(121).validate(),
            Err(ValidationError::OutOfRange {
                field: "age",
                value: 121,
                min: 0,
                max: 120
            })
        );
        assert!(PatientData::new(-1).validate().is_err());
    }

    #[test]
    fn test_validate_indicator_is_binary() {
        let patient = PatientData::new(30).with(Feature::Dizziness, 2);
        let err = patient.validate().unwrap_err();
        assert!(err.to_string().contains("dizziness"));

        let patient = PatientData::new(30).with(Feature::ChestPain, -1);
        assert!(patient.validate().is_err());
    }

    #[test]
    fn test_missing_field_fails_to_deserialize() {
        let mut value = serde_json::to_value(PatientData::new(30)).unwrap();
        value.as_object_mut().unwrap().remove("age");
        assert!(serde_json::from_value::<PatientData>(value).is_err());
    }

    #[test]
    fn test_whole_floats_are_integers() {
        let mut value = serde_json::to_value(PatientData::new(30)).unwrap();
        value["age"] = serde_json::json!(70.0);
        value["chest_pain"] = serde_json::json!(1.0);
        let patient: PatientData = serde_json::from_value(value).unwrap();
        assert_eq!(patient, PatientData::new(70).with(Feature::ChestPain, 1));
    }

    #[test]
    fn test_fractional_and_text_values_fail_to_deserialize() {
        for bad in [serde_json::json!(70.5), serde_json::json!("70"), serde_json::json!(null)] {
            let mut value = serde_json::to_value(PatientData::new(30)).unwrap();
            value["age"] = bad.clone();
            assert!(
                serde_json::from_value::<PatientData>(value).is_err(),
                "accepted {bad}"
            );
        }
    }
}
