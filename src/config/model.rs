//! Model artifact settings

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where to find the model artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Artifact path, relative to the working directory or `model_dir`
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Fallback directory searched when `path` does not exist
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,
}

fn default_path() -> PathBuf {
    PathBuf::from("hfp.json")
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("./models")
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            model_dir: default_model_dir(),
        }
    }
}

impl ModelConfig {
    /// Artifact location after falling back to the model directory
    pub fn resolved_path(&self) -> PathBuf {
        crate::loader::resolve_model_path(&self.path, &self.model_dir)
    }
}
