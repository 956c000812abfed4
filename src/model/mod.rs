//! Classifier abstraction and fitted model formats.
//!
//! A model artifact is a serde document holding fitted parameters. Every
//! supported estimator is exposed through the [`Classifier`] trait.

mod artifact;
pub mod features;
mod forest;
mod logistic;

pub use artifact::{DecisionTree, Estimator, ModelArtifact, ModelKind, ModelMetadata};
pub use features::{FeatureVector, BINARY_FEATURES, FEATURE_NAMES, N_FEATURES};
pub use forest::{RandomForest, TreeNodes};
pub use logistic::{LogisticRegression, StandardScaler};

use anyhow::{anyhow, bail, Result};

/// A fitted binary (or degenerate single-class) classifier
pub trait Classifier: Send + Sync {
    /// Number of input columns
    fn n_features(&self) -> usize;

    /// Class labels, in the order `predict_proba` reports them
    fn classes(&self) -> &[i64];

    /// Per-class probabilities for a single row
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>>;

    /// Most probable class label for a single row
    fn predict(&self, features: &[f64]) -> Result<i64> {
        let proba = self.predict_proba(features)?;
        let best = argmax(&proba).ok_or_else(|| anyhow!("empty probability distribution"))?;
        self.classes()
            .get(best)
            .copied()
            .ok_or_else(|| anyhow!("class index {} out of range", best))
    }
}

/// Reject rows of the wrong width or with non-finite values
pub(crate) fn check_row(features: &[f64], expected: usize) -> Result<()> {
    if features.len() != expected {
        bail!(
            "X has {} features, but the model is expecting {} features as input",
            features.len(),
            expected
        );
    }
    if let Some(pos) = features.iter().position(|v| !v.is_finite()) {
        bail!("Input contains a non-finite value at column {}", pos);
    }
    Ok(())
}

/// Index of the largest value; the first one wins ties
fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
