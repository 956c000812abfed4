//! Artifact format and location detection

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

/// Serialization format of a model artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Json,
    Yaml,
}

/// A resolved artifact file and its format
#[derive(Debug, Clone)]
pub struct ModelSource {
    pub path: PathBuf,
    pub format: ModelFormat,
}

/// File names probed, in order, when the model path is a directory
const ARTIFACT_NAMES: [&str; 4] = ["hfp.json", "hfp.yaml", "hfp.yml", "model.json"];

/// Detect the artifact format from a path
///
/// The path can be a `.json`, `.yaml` or `.yml` file, or a directory
/// containing one of the conventional artifact names.
pub fn detect_model_source<P: AsRef<Path>>(path: P) -> Result<ModelSource> {
    let path = path.as_ref();

    if path.is_file() {
        let format = format_from_extension(path)?;
        Ok(ModelSource {
            path: path.to_path_buf(),
            format,
        })
    } else if path.is_dir() {
        ARTIFACT_NAMES
            .iter()
            .map(|name| path.join(name))
            .find(|candidate| candidate.is_file())
            .map(|candidate| -> Result<ModelSource> {
                let format = format_from_extension(&candidate)?;
                Ok(ModelSource {
                    path: candidate,
                    format,
                })
            })
            .unwrap_or_else(|| {
                Err(anyhow!(
                    "No model artifact found in directory: {}",
                    path.display()
                ))
            })
    } else {
        Err(anyhow!("Model path does not exist: {}", path.display()))
    }
}

fn format_from_extension(path: &Path) -> Result<ModelFormat> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "json" => Ok(ModelFormat::Json),
        "yaml" | "yml" => Ok(ModelFormat::Yaml),
        _ => Err(anyhow!("Unsupported model file format: .{}", ext)),
    }
}

/// Resolve a model path, falling back to the model directory
///
/// Returns the path unchanged when neither location exists so that the
/// load error reports what the operator asked for.
pub fn resolve_model_path(path: &Path, model_dir: &Path) -> PathBuf {
    if path.exists() {
        return path.to_path_buf();
    }

    let in_dir = model_dir.join(path);
    if in_dir.exists() {
        return in_dir;
    }

    path.to_path_buf()
}
