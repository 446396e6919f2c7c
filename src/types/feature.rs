//! Feature schema shared by the service, both form front-ends and
//! artifact validation.
//!
//! The declaration order of [`Feature::ALL`] is the column order the
//! classifier was trained on. Nothing else in the crate keeps its own copy
//! of that order.

/// Number of model input columns (15 indicators + age).
pub const FEATURE_COUNT: usize = 16;

/// One model input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    ChestPain,
    ShortnessOfBreath,
    IrregularHeartbeat,
    FatigueWeakness,
    Dizziness,
    SwellingEdema,
    PainNeckJawShoulderBack,
    ExcessiveSweating,
    PersistentCough,
    NauseaVomiting,
    HighBloodPressure,
    ChestDiscomfortActivity,
    ColdHandsFeet,
    SnoringSleepApnea,
    AnxietyFeelingOfDoom,
    Age,
}

/// Grouping used when laying out the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormSection {
    Demographics,
    GeneralSymptoms,
    StartlingSymptoms,
    PhysicalIndications,
    Conditions,
}

impl FormSection {
    /// Symptom sections in the order they appear on the form.
    pub const SYMPTOM_SECTIONS: [FormSection; 4] = [
        FormSection::GeneralSymptoms,
        FormSection::StartlingSymptoms,
        FormSection::PhysicalIndications,
        FormSection::Conditions,
    ];

    pub fn title(self) -> &'static str {
        match self {
            FormSection::Demographics => "Personal Information",
            FormSection::GeneralSymptoms => "General Symptoms",
            FormSection::StartlingSymptoms => "Startling Symptoms",
            FormSection::PhysicalIndications => "Physical Indications",
            FormSection::Conditions => "Conditions",
        }
    }
}

impl Feature {
    /// All columns in training order.
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::ChestPain,
        Feature::ShortnessOfBreath,
        Feature::IrregularHeartbeat,
        Feature::FatigueWeakness,
        Feature::Dizziness,
        Feature::SwellingEdema,
        Feature::PainNeckJawShoulderBack,
        Feature::ExcessiveSweating,
        Feature::PersistentCough,
        Feature::NauseaVomiting,
        Feature::HighBloodPressure,
        Feature::ChestDiscomfortActivity,
        Feature::ColdHandsFeet,
        Feature::SnoringSleepApnea,
        Feature::AnxietyFeelingOfDoom,
        Feature::Age,
    ];

    /// Position of this column in the feature record.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether this column is a 0/1 symptom or condition indicator.
    pub fn is_indicator(self) -> bool {
        self != Feature::Age
    }

    /// The 15 indicator columns in training order.
    pub fn indicators() -> impl Iterator<Item = Feature> {
        Self::ALL.into_iter().filter(|f| f.is_indicator())
    }

    /// Field name on the REST API and in form submissions.
    pub fn api_name(self) -> &'static str {
        match self {
            Feature::ChestPain => "chest_pain",
            Feature::ShortnessOfBreath => "shortness_of_breath",
            Feature::IrregularHeartbeat => "irregular_heartbeat",
            Feature::FatigueWeakness => "fatigue_weakness",
            Feature::Dizziness => "dizziness",
            Feature::SwellingEdema => "swelling_edema",
            Feature::PainNeckJawShoulderBack => "pain_neck_jaw_shoulder_back",
            Feature::ExcessiveSweating => "excessive_sweating",
            Feature::PersistentCough => "persistent_cough",
            Feature::NauseaVomiting => "nausea_vomiting",
            Feature::HighBloodPressure => "high_blood_pressure",
            Feature::ChestDiscomfortActivity => "chest_discomfort_activity",
            Feature::ColdHandsFeet => "cold_hands_feet",
            Feature::SnoringSleepApnea => "snoring_sleep_apnea",
            Feature::AnxietyFeelingOfDoom => "anxiety_feeling_of_doom",
            Feature::Age => "age",
        }
    }

    /// Column name the classifier was trained with.
    pub fn column_name(self) -> &'static str {
        match self {
            Feature::ChestPain => "Chest Pain",
            Feature::ShortnessOfBreath => "Shortness of Breath",
            Feature::IrregularHeartbeat => "Irregular Heartbeat",
            Feature::FatigueWeakness => "Fatigue & Weakness",
            Feature::Dizziness => "Dizziness",
            Feature::SwellingEdema => "Swelling (Edema)",
            Feature::PainNeckJawShoulderBack => "Pain in Neck/Jaw/Shoulder/Back",
            Feature::ExcessiveSweating => "Excessive Sweating",
            Feature::PersistentCough => "Persistent Cough",
            Feature::NauseaVomiting => "Nausea/Vomiting",
            Feature::HighBloodPressure => "High Blood Pressure",
            Feature::ChestDiscomfortActivity => "Chest Discomfort (Activity)",
            Feature::ColdHandsFeet => "Cold Hands/Feet",
            Feature::SnoringSleepApnea => "Snoring/Sleep Apnea",
            Feature::AnxietyFeelingOfDoom => "Anxiety/Feeling of Doom",
            Feature::Age => "Age",
        }
    }

    /// Label shown next to the form control.
    pub fn label(self) -> &'static str {
        match self {
            Feature::PainNeckJawShoulderBack => "Pain in Neck/Jaw/Back",
            Feature::NauseaVomiting => "Nausea / Vomiting",
            Feature::SnoringSleepApnea => "Snoring / Sleep Apnea",
            Feature::AnxietyFeelingOfDoom => "Anxiety / Feeling of Doom",
            other => other.column_name(),
        }
    }

    /// Tooltip shown for the form control.
    pub fn help(self) -> &'static str {
        match self {
            Feature::ChestPain => "Do you experience pain in your chest?",
            Feature::ShortnessOfBreath => "Do you feel winded easily?",
            Feature::IrregularHeartbeat => {
                "Does your heart feel like it's fluttering or beating irregularly?"
            }
            Feature::FatigueWeakness => "Do you often feel unusually tired or weak?",
            Feature::Dizziness => "Do you experience sudden dizziness or lightheadedness?",
            Feature::SwellingEdema => "Do you have swelling in your legs or ankles?",
            Feature::PainNeckJawShoulderBack => "Do you have unexplained pain in these areas?",
            Feature::ExcessiveSweating => "Do you sweat more than usual without exercise?",
            Feature::PersistentCough => "Do you have a cough that won't go away?",
            Feature::NauseaVomiting => "Do you feel sick to your stomach often?",
            Feature::HighBloodPressure => "Have you been diagnosed with hypertension?",
            Feature::ChestDiscomfortActivity => {
                "Do you feel pressure in your chest during physical activity?"
            }
            Feature::ColdHandsFeet => "Are your hands or feet frequently cold?",
            Feature::SnoringSleepApnea => "Do you snore loudly or gasp for air during sleep?",
            Feature::AnxietyFeelingOfDoom => "Do you experience sudden severe anxiety?",
            Feature::Age => "Enter your age in years.",
        }
    }

    pub fn section(self) -> FormSection {
        match self {
            Feature::FatigueWeakness
            | Feature::Dizziness
            | Feature::ExcessiveSweating
            | Feature::ColdHandsFeet
            | Feature::AnxietyFeelingOfDoom => FormSection::GeneralSymptoms,
            Feature::ChestPain | Feature::ShortnessOfBreath | Feature::IrregularHeartbeat => {
                FormSection::StartlingSymptoms
            }
            Feature::SwellingEdema
            | Feature::PainNeckJawShoulderBack
            | Feature::PersistentCough
            | Feature::NauseaVomiting => FormSection::PhysicalIndications,
            Feature::HighBloodPressure
            | Feature::ChestDiscomfortActivity
            | Feature::SnoringSleepApnea => FormSection::Conditions,
            Feature::Age => FormSection::Demographics,
        }
    }

    /// Look up a column by its API field name.
    pub fn from_api_name(name: &str) -> Option<Feature> {
        Self::ALL.into_iter().find(|f| f.api_name() == name)
    }

    /// Training column names in record order.
    pub fn column_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|f| f.column_name()).collect()
    }
}
