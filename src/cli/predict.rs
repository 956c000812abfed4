//! One-shot prediction command

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tokio::io::AsyncReadExt;

use super::{load_config, model_path};
use crate::engine::{ModelGateway, Predictor};

/// Score one JSON record from a file or stdin
pub async fn predict(model: Option<PathBuf>, input: Option<PathBuf>) -> Result<()> {
    let mut config = load_config(None)?;
    let gateway = ModelGateway::load(model_path(&mut config, model));

    if let Some(reason) = gateway.unavailable_reason() {
        return Err(anyhow!("Model not loaded: {}", reason));
    }

    let body = match input {
        Some(path) => tokio::fs::read(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            tokio::io::stdin().read_to_end(&mut buf).await?;
            buf
        }
    };

    let predictor = Predictor::new(Arc::new(gateway));
    match predictor.handle_body(&body) {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            println!("{}", serde_json::json!({ "error": e.to_string() }));
            Err(e.into())
        }
    }
}
