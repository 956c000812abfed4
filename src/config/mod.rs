//! Configuration system for hfp
//!
//! Settings come from, in increasing precedence: built-in defaults, an
//! optional YAML/JSON file, `HFP_*` environment variables and CLI flags.

mod model;
mod server;

pub use model::ModelConfig;
pub use server::ServerConfig;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the artifact path
pub const ENV_MODEL_PATH: &str = "HFP_MODEL_PATH";
/// Environment variable overriding the fallback model directory
pub const ENV_MODEL_DIR: &str = "HFP_MODEL_DIR";
/// Environment variable overriding the listen port
pub const ENV_PORT: &str = "HFP_PORT";
/// Environment variable overriding the bind host
pub const ENV_HOST: &str = "HFP_HOST";

/// Service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HfpConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Model artifact settings
    #[serde(default)]
    pub model: ModelConfig,
}

impl HfpConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration, picking the format from the file extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let config = match ext {
            "yaml" | "yml" => Self::from_yaml(path),
            "json" => Self::from_json(path),
            other => Err(anyhow!("unsupported config format: .{}", other)),
        };
        config.with_context(|| format!("failed to load config {}", path.display()))
    }

    /// Apply `HFP_*` overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_MODEL_PATH) {
            self.model.path = PathBuf::from(path);
        }
        if let Some(dir) = lookup(ENV_MODEL_DIR) {
            self.model.model_dir = PathBuf::from(dir);
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .parse()
                .with_context(|| format!("invalid {}: {:?}", ENV_PORT, port))?;
        }
        if let Some(host) = lookup(ENV_HOST) {
            self.server.host = host;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = HfpConfig::default();
        assert_eq!(config.server.addr(), "0.0.0.0:5000");
        assert!(config.server.cors_enabled);
        assert!(config.server.cors_origins.is_empty());
        assert_eq!(config.model.path, PathBuf::from("hfp.json"));
    }

    #[test]
    fn test_hfp_config_yaml() {
        let yaml = r#"
server:
  port: 8080
  host: 127.0.0.1
  cors_origins:
    - https://app.example.com
  max_body_size: 4096

model:
  path: models/forest.yaml
"#;
        let config: HfpConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.addr(), "127.0.0.1:8080");
        assert_eq!(config.server.cors_origins.len(), 1);
        assert_eq!(config.server.max_body_size, 4096);
        assert!(config.server.request_logging);
        assert_eq!(config.model.path, PathBuf::from("models/forest.yaml"));
        assert_eq!(config.model.model_dir, PathBuf::from("./models"));
    }

    #[test]
    fn test_from_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json = dir.path().join("hfp.json");
        std::fs::write(&json, r#"{"server": {"port": 9000}}"#).unwrap();
        assert_eq!(HfpConfig::from_file(&json).unwrap().server.port, 9000);

        let toml = dir.path().join("hfp.toml");
        std::fs::write(&toml, "").unwrap();
        assert!(HfpConfig::from_file(&toml).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_MODEL_PATH, "/srv/hfp.json"),
            (ENV_PORT, "7000"),
            (ENV_HOST, "127.0.0.1"),
        ]
        .into_iter()
        .collect();

        let mut config = HfpConfig::default();
        config
            .apply_env_with(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.model.path, PathBuf::from("/srv/hfp.json"));
        assert_eq!(config.server.addr(), "127.0.0.1:7000");
    }

    #[test]
    fn test_invalid_port_env() {
        let mut config = HfpConfig::default();
        let result = config.apply_env_with(|key| (key == ENV_PORT).then(|| "http".to_string()));
        assert!(result.is_err());
    }
}
