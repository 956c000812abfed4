//! Logistic regression with an optional standard scaler

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::{check_row, Classifier};

/// Standardization applied before the linear term: `(x - mean) / scale`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    fn transform(&self, x: f64, i: usize) -> f64 {
        let scale = self.scale[i];
        // constant columns are fitted with a zero scale
        let scale = if scale == 0.0 { 1.0 } else { scale };
        (x - self.mean[i]) / scale
    }
}

/// Fitted logistic regression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,

    #[serde(default)]
    pub intercept: f64,

    #[serde(default)]
    pub scaler: Option<StandardScaler>,

    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
}

fn default_classes() -> Vec<i64> {
    vec![0, 1]
}

impl LogisticRegression {
    pub fn validate(&self) -> Result<()> {
        if self.coefficients.is_empty() {
            bail!("logistic regression has no coefficients");
        }
        match self.classes.len() {
            1 | 2 => {}
            n => bail!("logistic regression supports 1 or 2 classes, got {}", n),
        }
        if let Some(scaler) = &self.scaler {
            let n = self.coefficients.len();
            if scaler.mean.len() != n || scaler.scale.len() != n {
                bail!(
                    "scaler has {} means and {} scales for {} coefficients",
                    scaler.mean.len(),
                    scaler.scale.len(),
                    n
                );
            }
            if scaler.mean.iter().chain(&scaler.scale).any(|v| !v.is_finite()) {
                bail!("scaler parameters must be finite");
            }
        }
        if self
            .coefficients
            .iter()
            .chain(std::iter::once(&self.intercept))
            .any(|v| !v.is_finite())
        {
            bail!("logistic regression parameters must be finite");
        }
        Ok(())
    }

    /// Linear term `w·x + b` after scaling
    pub fn decision_function(&self, features: &[f64]) -> f64 {
        let dot: f64 = features
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let x = match &self.scaler {
                    Some(scaler) => scaler.transform(x, i),
                    None => x,
                };
                x * self.coefficients[i]
            })
            .sum();
        dot + self.intercept
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticRegression {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        check_row(features, self.n_features())?;

        if self.classes.len() == 1 {
            return Ok(vec![1.0]);
        }

        let p = sigmoid(self.decision_function(features));
        Ok(vec![1.0 - p, p])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LogisticRegression {
        LogisticRegression {
            coefficients: vec![1.0, -2.0],
            intercept: 0.5,
            scaler: None,
            classes: vec![0, 1],
        }
    }

    #[test]
    fn test_sigmoid_is_symmetric() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!((sigmoid(3.0) + sigmoid(-3.0) - 1.0).abs() < 1e-12);
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!(sigmoid(1000.0) <= 1.0);
    }

    #[test]
    fn test_predict_proba_sums_to_one() {
        let proba = model().predict_proba(&[2.0, 0.5]).unwrap();
        assert_eq!(proba.len(), 2);
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
        // z = 2 - 1 + 0.5 = 1.5
        assert!((proba[1] - sigmoid(1.5)).abs() < 1e-12);
    }

    #[test]
    fn test_predict_uses_class_labels() {
        let mut m = model();
        m.classes = vec![3, 7];
        assert_eq!(m.predict(&[10.0, 0.0]).unwrap(), 7);
        assert_eq!(m.predict(&[-10.0, 0.0]).unwrap(), 3);
    }

    #[test]
    fn test_scaler_is_applied() {
        let mut m = model();
        m.scaler = Some(StandardScaler {
            mean: vec![2.0, 0.5],
            scale: vec![2.0, 0.0],
        });
        // both columns land on zero, leaving only the intercept
        assert!((m.decision_function(&[2.0, 0.5]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_single_class_model() {
        let mut m = model();
        m.classes = vec![0];
        assert_eq!(m.predict_proba(&[1.0, 1.0]).unwrap(), vec![1.0]);
        assert_eq!(m.predict(&[1.0, 1.0]).unwrap(), 0);
    }

    #[test]
    fn test_validate() {
        assert!(model().validate().is_ok());

        let mut m = model();
        m.classes = vec![0, 1, 2];
        assert!(m.validate().is_err());

        let mut m = model();
        m.scaler = Some(StandardScaler {
            mean: vec![0.0],
            scale: vec![1.0],
        });
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_scaler() {
        let mut m = model();
        m.scaler = Some(StandardScaler {
            mean: vec![0.0, f64::NAN],
            scale: vec![1.0, 1.0],
        });
        assert!(m.validate().is_err());

        let mut m = model();
        m.scaler = Some(StandardScaler {
            mean: vec![0.0, 0.0],
            scale: vec![f64::INFINITY, 1.0],
        });
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_wrong_width_is_rejected() {
        assert!(model().predict_proba(&[1.0]).is_err());
    }
}
