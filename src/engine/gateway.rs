//! Model gateway
//!
//! Owns the classifier loaded at startup. A gateway is either ready for the
//! whole process lifetime or permanently unavailable; there is no reload.

use std::path::Path;

use anyhow::{anyhow, bail, Result};

use crate::loader::{self, ModelInfo};
use crate::model::{Classifier, FEATURE_NAMES, N_FEATURES};

enum GatewayState {
    Ready {
        model: Box<dyn Classifier>,
        info: Option<ModelInfo>,
    },
    Unavailable {
        reason: String,
    },
}

/// Read-only handle to the loaded classifier
///
/// Never mutated after construction, so it can be shared behind an `Arc`
/// by any number of concurrent requests without locking.
pub struct ModelGateway {
    state: GatewayState,
}

impl ModelGateway {
    /// Load the artifact at `path`
    ///
    /// Failures are logged and leave the gateway unavailable rather than
    /// aborting startup.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        tracing::info!("Loading model from {}", path.display());

        match loader::load_model(path).and_then(|(model, info)| {
            check_schema(model.as_ref(), &info)?;
            Ok((model, info))
        }) {
            Ok((model, info)) => {
                tracing::info!(
                    "Model loaded successfully: {} ({} features, classes {:?})",
                    info.kind,
                    info.n_features,
                    info.classes
                );
                Self {
                    state: GatewayState::Ready {
                        model,
                        info: Some(info),
                    },
                }
            }
            Err(e) => {
                tracing::error!("Error loading model: {:#}", e);
                Self::unavailable(format!("{:#}", e))
            }
        }
    }

    /// Wrap an already constructed classifier
    pub fn from_classifier(model: Box<dyn Classifier>) -> Self {
        Self {
            state: GatewayState::Ready { model, info: None },
        }
    }

    /// A gateway that never serves predictions
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: GatewayState::Unavailable {
                reason: reason.into(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, GatewayState::Ready { .. })
    }

    /// Why loading failed, if it did
    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.state {
            GatewayState::Unavailable { reason } => Some(reason.as_str()),
            GatewayState::Ready { .. } => None,
        }
    }

    /// Metadata of the loaded artifact, when it came from disk
    pub fn info(&self) -> Option<&ModelInfo> {
        match &self.state {
            GatewayState::Ready { info, .. } => info.as_ref(),
            GatewayState::Unavailable { .. } => None,
        }
    }

    fn model(&self) -> Result<&dyn Classifier> {
        match &self.state {
            GatewayState::Ready { model, .. } => Ok(model.as_ref()),
            GatewayState::Unavailable { reason } => Err(anyhow!("model unavailable: {}", reason)),
        }
    }

    /// Predicted class label for one row
    pub fn classify(&self, features: &[f64]) -> Result<i64> {
        self.model()?.predict(features)
    }

    /// Per-class probabilities for one row
    pub fn classify_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        self.model()?.predict_proba(features)
    }
}

/// Check the artifact against the fixed feature order
fn check_schema(model: &dyn Classifier, info: &ModelInfo) -> Result<()> {
    if model.n_features() != N_FEATURES {
        bail!(
            "model expects {} input features, this service provides {}",
            model.n_features(),
            N_FEATURES
        );
    }

    if let Some(names) = &info.feature_names {
        if let Some((i, (got, want))) = names
            .iter()
            .zip(FEATURE_NAMES)
            .enumerate()
            .find(|(_, (got, want))| got.as_str() != *want)
        {
            bail!(
                "model feature {} is {:?}, expected {:?}",
                i,
                got,
                want
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LogisticRegression;

    fn model(n: usize) -> LogisticRegression {
        LogisticRegression {
            coefficients: vec![0.0; n],
            intercept: 1.0,
            scaler: None,
            classes: vec![0, 1],
        }
    }

    fn write_artifact(dir: &Path, body: serde_json::Value) -> std::path::PathBuf {
        let path = dir.join("hfp.json");
        std::fs::write(&path, body.to_string()).unwrap();
        path
    }

    #[test]
    fn test_ready_gateway() {
        let gateway = ModelGateway::from_classifier(Box::new(model(N_FEATURES)));
        assert!(gateway.is_ready());
        assert!(gateway.unavailable_reason().is_none());

        let row = [0.0; N_FEATURES];
        assert_eq!(gateway.classify(&row).unwrap(), 1);
        assert_eq!(gateway.classify_proba(&row).unwrap().len(), 2);
    }

    #[test]
    fn test_unavailable_gateway_refuses_inference() {
        let gateway = ModelGateway::unavailable("boom");
        assert!(!gateway.is_ready());
        assert_eq!(gateway.unavailable_reason(), Some("boom"));
        assert!(gateway.classify(&[0.0; N_FEATURES]).is_err());
        assert!(gateway.classify_proba(&[0.0; N_FEATURES]).is_err());
    }

    #[test]
    fn test_load_missing_file_degrades() {
        let gateway = ModelGateway::load("/nonexistent/hfp.json");
        assert!(!gateway.is_ready());
        assert!(gateway.unavailable_reason().unwrap().contains("does not exist"));
    }

    #[test]
    fn test_load_checks_arity() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(
            dir.path(),
            serde_json::json!({"kind": "logistic_regression", "coefficients": [1.0, 2.0]}),
        );
        let gateway = ModelGateway::load(&path);
        assert!(!gateway.is_ready());
        assert!(gateway.unavailable_reason().unwrap().contains("12"));
    }

    #[test]
    fn test_load_checks_feature_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut names: Vec<&str> = FEATURE_NAMES.to_vec();
        names.swap(0, 1);
        let path = write_artifact(
            dir.path(),
            serde_json::json!({
                "kind": "logistic_regression",
                "feature_names": names,
                "coefficients": vec![0.1; N_FEATURES],
            }),
        );
        let gateway = ModelGateway::load(&path);
        assert!(!gateway.is_ready());
    }

    #[test]
    fn test_load_valid_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(
            dir.path(),
            serde_json::json!({
                "kind": "logistic_regression",
                "feature_names": FEATURE_NAMES,
                "coefficients": vec![0.1; N_FEATURES],
                "intercept": -0.5,
            }),
        );
        let gateway = ModelGateway::load(&path);
        assert!(gateway.is_ready());
        assert_eq!(gateway.info().unwrap().n_features, N_FEATURES);
    }
}
