//! Serialized model artifact

use std::fmt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::{Classifier, LogisticRegression, RandomForest, TreeNodes};

/// Estimator family of an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    LogisticRegression,
    RandomForest,
    DecisionTree,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::LogisticRegression => "logistic_regression",
            ModelKind::RandomForest => "random_forest",
            ModelKind::DecisionTree => "decision_tree",
        };
        f.write_str(name)
    }
}

/// Descriptive fields shared by every artifact
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Human readable model name
    #[serde(default)]
    pub name: Option<String>,

    /// Artifact version string
    #[serde(default)]
    pub version: Option<String>,

    /// Column names the estimator was fitted on, in order
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

/// A single fitted tree together with its input shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub tree: TreeNodes,
}

/// Fitted estimator parameters, tagged by `kind`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    LogisticRegression(LogisticRegression),
    RandomForest(RandomForest),
    DecisionTree(DecisionTree),
}

/// Complete model artifact as stored on disk
///
/// ```json
/// {
///   "kind": "logistic_regression",
///   "name": "heart-failure",
///   "coefficients": [0.05, ...],
///   "intercept": -1.2,
///   "classes": [0, 1]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    #[serde(flatten)]
    pub metadata: ModelMetadata,

    #[serde(flatten)]
    pub estimator: Estimator,
}

impl ModelArtifact {
    pub fn kind(&self) -> ModelKind {
        match self.estimator {
            Estimator::LogisticRegression(_) => ModelKind::LogisticRegression,
            Estimator::RandomForest(_) => ModelKind::RandomForest,
            Estimator::DecisionTree(_) => ModelKind::DecisionTree,
        }
    }

    /// Number of input columns the estimator expects
    pub fn n_features(&self) -> usize {
        match &self.estimator {
            Estimator::LogisticRegression(m) => m.coefficients.len(),
            Estimator::RandomForest(m) => m.n_features,
            Estimator::DecisionTree(m) => m.n_features,
        }
    }

    /// Check internal consistency of the fitted parameters
    pub fn validate(&self) -> Result<()> {
        match &self.estimator {
            Estimator::LogisticRegression(m) => m.validate()?,
            Estimator::RandomForest(m) => m.validate()?,
            Estimator::DecisionTree(m) => single_tree_forest(m.clone()).validate()?,
        }

        if let Some(names) = &self.metadata.feature_names {
            if names.len() != self.n_features() {
                bail!(
                    "artifact lists {} feature names for {} input columns",
                    names.len(),
                    self.n_features()
                );
            }
        }
        Ok(())
    }

    /// Build the runtime classifier
    pub fn into_classifier(self) -> Box<dyn Classifier> {
        match self.estimator {
            Estimator::LogisticRegression(m) => Box::new(m),
            Estimator::RandomForest(m) => Box::new(m),
            Estimator::DecisionTree(m) => Box::new(single_tree_forest(m)),
        }
    }
}

fn single_tree_forest(tree: DecisionTree) -> RandomForest {
    RandomForest {
        n_features: tree.n_features,
        classes: tree.classes,
        trees: vec![tree.tree],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logistic_artifact_json() {
        let json = r#"{
            "kind": "logistic_regression",
            "name": "demo",
            "version": "1",
            "feature_names": ["a", "b"],
            "coefficients": [1.0, -1.0],
            "intercept": 0.0
        }"#;
        let artifact: ModelArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(artifact.kind(), ModelKind::LogisticRegression);
        assert_eq!(artifact.n_features(), 2);
        assert_eq!(artifact.metadata.name.as_deref(), Some("demo"));
        artifact.validate().unwrap();

        let model = artifact.into_classifier();
        assert_eq!(model.classes(), &[0, 1]);
        assert_eq!(model.predict(&[2.0, 1.0]).unwrap(), 1);
    }

    #[test]
    fn test_decision_tree_artifact_yaml() {
        let yaml = r#"
kind: decision_tree
n_features: 1
classes: [0, 1]
tree:
  children_left: [1, -1, -1]
  children_right: [2, -1, -1]
  feature: [0, -2, -2]
  threshold: [10.0, -2.0, -2.0]
  value: [[5, 5], [4, 1], [1, 4]]
"#;
        let artifact: ModelArtifact = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(artifact.kind(), ModelKind::DecisionTree);
        artifact.validate().unwrap();

        let model = artifact.into_classifier();
        let proba = model.predict_proba(&[20.0]).unwrap();
        assert!((proba[1] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_feature_name_count_must_match() {
        let json = r#"{
            "kind": "logistic_regression",
            "feature_names": ["a"],
            "coefficients": [1.0, -1.0]
        }"#;
        let artifact: ModelArtifact = serde_json::from_str(json).unwrap();
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let json = r#"{"kind": "svm", "coefficients": [1.0]}"#;
        assert!(serde_json::from_str::<ModelArtifact>(json).is_err());
    }

    #[test]
    fn test_kind_display_matches_serde() {
        for kind in [
            ModelKind::LogisticRegression,
            ModelKind::RandomForest,
            ModelKind::DecisionTree,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }
}
