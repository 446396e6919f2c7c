//! Classifier backends read from JSON artifacts

use crate::error::PredictError;
use crate::feature_extractor::FeatureRecord;
use crate::types::feature::{Feature, FEATURE_COUNT};
use serde::Deserialize;

/// A trained binary classifier.
///
/// `predict` is the classifier's own decision rule; callers never
/// recompute it from `predict_proba`.
pub trait Classifier: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Class probabilities `[p(class 0), p(class 1)]`.
    fn predict_proba(&self, features: &FeatureRecord) -> Result<[f64; 2], PredictError>;

    /// Predicted class (0 or 1).
    fn predict(&self, features: &FeatureRecord) -> Result<u8, PredictError>;

    /// Class and probabilities together.
    ///
    /// Backends that produce both from one evaluation override this.
    fn classify(&self, features: &FeatureRecord) -> Result<(u8, [f64; 2]), PredictError> {
        Ok((self.predict(features)?, self.predict_proba(features)?))
    }
}

/// Serialized classifier document, tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    LogisticRegression(LogisticRegression),
    RandomForest(RandomForest),
}

impl ClassifierArtifact {
    /// Structural checks run once at load time.
    pub fn check(&self) -> Result<(), String> {
        match self {
            ClassifierArtifact::LogisticRegression(model) => model.check(),
            ClassifierArtifact::RandomForest(model) => model.check(),
        }
    }

    pub fn into_classifier(self) -> Box<dyn Classifier> {
        match self {
            ClassifierArtifact::LogisticRegression(model) => Box::new(model),
            ClassifierArtifact::RandomForest(model) => Box::new(model),
        }
    }
}

/// Column names stored with the artifact must match the record order.
fn check_feature_names(names: &Option<Vec<String>>) -> Result<(), String> {
    let Some(names) = names else {
        return Ok(());
    };
    let expected = Feature::column_names();
    if names.len() != expected.len() || names.iter().zip(&expected).any(|(a, b)| a != b) {
        return Err(format!(
            "feature_names {:?} do not match the expected column order {:?}",
            names, expected
        ));
    }
    Ok(())
}

/// Logistic regression over the full feature record.
#[derive(Debug, Clone, Deserialize)]
pub struct LogisticRegression {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    fn check(&self) -> Result<(), String> {
        check_feature_names(&self.feature_names)?;
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(format!(
                "expected {} coefficients, found {}",
                FEATURE_COUNT,
                self.coefficients.len()
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("coefficients and intercept must be finite".to_string());
        }
        Ok(())
    }

    fn decision_function(&self, features: &FeatureRecord) -> f64 {
        self.coefficients
            .iter()
            .zip(features.as_slice())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &str {
        "logistic_regression"
    }

    fn predict_proba(&self, features: &FeatureRecord) -> Result<[f64; 2], PredictError> {
        let z = self.decision_function(features);
        let p = 1.0 / (1.0 + (-z).exp());
        Ok([1.0 - p, p])
    }

    fn predict(&self, features: &FeatureRecord) -> Result<u8, PredictError> {
        Ok(u8::from(self.decision_function(features) > 0.0))
    }
}

/// Node of a decision tree stored as a flat array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: [f64; 2],
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    // Children always point forward, so every walk terminates.
    fn check(&self, tree: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err(format!("tree {tree} has no nodes"));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= FEATURE_COUNT {
                        return Err(format!(
                            "tree {tree} node {i} splits on unknown feature {feature}"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("tree {tree} node {i} has a non-finite threshold"));
                    }
                    for child in [left, right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(format!(
                                "tree {tree} node {i} has invalid child index {child}"
                            ));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                        return Err(format!("tree {tree} leaf {i} has invalid class weights"));
                    }
                    if value[0] + value[1] <= 0.0 {
                        return Err(format!("tree {tree} leaf {i} has zero total weight"));
                    }
                }
            }
        }
        Ok(())
    }

    /// Normalized class distribution of the leaf reached by `features`.
    fn leaf_distribution(&self, features: &FeatureRecord) -> Result<[f64; 2], PredictError> {
        let mut i = 0;
        loop {
            match self.nodes.get(i) {
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    i = if features.as_slice()[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                Some(TreeNode::Leaf { value }) => {
                    let total = value[0] + value[1];
                    return Ok([value[0] / total, value[1] / total]);
                }
                None => {
                    return Err(PredictError::Inference(format!(
                        "tree walk reached missing node {i}"
                    )))
                }
            }
        }
    }
}

/// Random forest: class probabilities averaged over trees.
#[derive(Debug, Clone, Deserialize)]
pub struct RandomForest {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    fn check(&self) -> Result<(), String> {
        check_feature_names(&self.feature_names)?;
        if self.trees.is_empty() {
            return Err("random forest has no trees".to_string());
        }
        self.trees
            .iter()
            .enumerate()
            .try_for_each(|(t, tree)| tree.check(t))
    }
}

impl Classifier for RandomForest {
    fn name(&self) -> &str {
        "random_forest"
    }

    fn predict_proba(&self, features: &FeatureRecord) -> Result<[f64; 2], PredictError> {
        let mut sum = [0.0, 0.0];
        for tree in &self.trees {
            let [p0, p1] = tree.leaf_distribution(features)?;
            sum[0] += p0;
            sum[1] += p1;
        }
        let n = self.trees.len() as f64;
        Ok([sum[0] / n, sum[1] / n])
    }

    fn predict(&self, features: &FeatureRecord) -> Result<u8, PredictError> {
        let [p0, p1] = self.predict_proba(features)?;
        // argmax, first class wins ties
        Ok(u8::from(p1 > p0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_extractor::FeatureExtractor;
    use crate::types::PatientData;

    fn logistic(intercept: f64) -> LogisticRegression {
        let mut coefficients = vec![0.0; FEATURE_COUNT];
        coefficients[Feature::ChestPain.index()] = 2.0;
        LogisticRegression {
            feature_names: None,
            coefficients,
            intercept,
        }
    }

    fn record(patient: &PatientData) -> FeatureRecord {
        FeatureExtractor::new().extract(patient)
    }

    #[test]
    fn test_logistic_probability() {
        let model = logistic(-1.0);
        let with_pain = record(&PatientData::new(0).with(Feature::ChestPain, 1));
        let without = record(&PatientData::new(0));

        let [p0, p1] = model.predict_proba(&with_pain).unwrap();
        assert!((p0 + p1 - 1.0).abs() < 1e-12);
        assert!((p1 - 1.0 / (1.0 + (-1.0_f64).exp())).abs() < 1e-12);
        assert_eq!(model.predict(&with_pain).unwrap(), 1);
        assert_eq!(model.predict(&without).unwrap(), 0);
    }

    #[test]
    fn test_logistic_check_coefficient_count() {
        let mut model = logistic(0.0);
        model.coefficients.pop();
        assert!(model.check().is_err());
    }

    #[test]
    fn test_feature_names_must_match_order() {
        let mut names: Vec<String> = Feature::column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let mut model = logistic(0.0);
        model.feature_names = Some(names.clone());
        assert!(model.check().is_ok());

        names.swap(0, 1);
        model.feature_names = Some(names);
        assert!(model.check().is_err());
    }

    fn stump() -> RandomForest {
        serde_json::from_str(
            r#"{
                "trees": [
                    {"nodes": [
                        {"feature": 0, "threshold": 0.5, "left": 1, "right": 2},
                        {"value": [9, 1]},
                        {"value": [2, 8]}
                    ]},
                    {"nodes": [
                        {"feature": 15, "threshold": 60, "left": 1, "right": 2},
                        {"value": [1.0, 0.0]},
                        {"value": [0.0, 1.0]}
                    ]}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_forest_averages_trees() {
        let forest = stump();
        assert!(forest.check().is_ok());

        let young = record(&PatientData::new(30).with(Feature::ChestPain, 1));
        let [_, p1] = forest.predict_proba(&young).unwrap();
        assert!((p1 - 0.4).abs() < 1e-12);
        assert_eq!(forest.predict(&young).unwrap(), 0);

        let old = record(&PatientData::new(70).with(Feature::ChestPain, 1));
        let [_, p1] = forest.predict_proba(&old).unwrap();
        assert!((p1 - 0.9).abs() < 1e-12);
        assert_eq!(forest.predict(&old).unwrap(), 1);
    }

    #[test]
    fn test_forest_rejects_backward_child() {
        let mut forest = stump();
        forest.trees[0].nodes[0] = TreeNode::Split {
            feature: 0,
            threshold: 0.5,
            left: 0,
            right: 2,
        };
        assert!(forest.check().is_err());
    }

    #[test]
    fn test_artifact_tag() {
        let artifact: ClassifierArtifact = serde_json::from_value(serde_json::json!({
            "kind": "logistic_regression",
            "coefficients": vec![0.1; FEATURE_COUNT],
            "intercept": -0.5
        }))
        .unwrap();
        assert!(artifact.check().is_ok());
        assert_eq!(artifact.into_classifier().name(), "logistic_regression");
    }
}
