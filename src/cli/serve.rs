//! HTTP server command

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use super::{load_config, model_path};
use crate::engine::ModelGateway;
use crate::server;

/// Start the prediction server
pub async fn serve(
    model: Option<PathBuf>,
    port: Option<u16>,
    host: Option<String>,
    config: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config(config.as_deref())?;

    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(host) = host {
        config.server.host = host;
    }

    // Load once, before the listener accepts anything
    let gateway = Arc::new(ModelGateway::load(model_path(&mut config, model)));
    if !gateway.is_ready() {
        tracing::warn!("Starting without a model; /predict will answer \"Model not loaded\"");
    }

    tracing::info!("Starting server at http://{}", config.server.addr());

    server::start(gateway, config.server).await?;

    Ok(())
}
