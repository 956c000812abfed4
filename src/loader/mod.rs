//! Model loading utilities
//!
//! Artifacts are JSON or YAML documents describing a fitted estimator.
//! Loading detects the format, deserializes, validates the parameters and
//! builds a [`Classifier`].

mod detect;

pub use detect::{detect_model_source, resolve_model_path, ModelFormat, ModelSource};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::model::{Classifier, ModelArtifact, ModelKind};

/// Summary of a loaded artifact
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub kind: ModelKind,
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub feature_names: Option<Vec<String>>,
    pub name: Option<String>,
    pub version: Option<String>,
    pub path: PathBuf,
}

/// Read and validate an artifact without building the classifier
pub fn read_artifact<P: AsRef<Path>>(path: P) -> Result<(ModelArtifact, ModelSource)> {
    let source = detect_model_source(path)?;

    let content = std::fs::read_to_string(&source.path)
        .with_context(|| format!("failed to read {}", source.path.display()))?;

    let artifact: ModelArtifact = match source.format {
        ModelFormat::Json => serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON artifact {}", source.path.display()))?,
        ModelFormat::Yaml => serde_yaml::from_str(&content)
            .with_context(|| format!("invalid YAML artifact {}", source.path.display()))?,
    };

    artifact
        .validate()
        .with_context(|| format!("invalid model in {}", source.path.display()))?;

    Ok((artifact, source))
}

/// Load a model from any supported format
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<(Box<dyn Classifier>, ModelInfo)> {
    let (artifact, source) = read_artifact(path)?;

    let kind = artifact.kind();
    let metadata = artifact.metadata.clone();
    let model = artifact.into_classifier();

    let info = ModelInfo {
        kind,
        n_features: model.n_features(),
        classes: model.classes().to_vec(),
        feature_names: metadata.feature_names,
        name: metadata.name,
        version: metadata.version,
        path: source.path,
    };

    tracing::debug!(
        "Loaded {} artifact from {} ({} features, classes {:?})",
        info.kind,
        info.path.display(),
        info.n_features,
        info.classes
    );

    Ok((model, info))
}
