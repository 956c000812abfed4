//! HTTP server for inference
//!
//! Exposes `POST /predict`, `GET /health` and `GET /model` as JSON.

mod handlers;
mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::engine::ModelGateway;

pub use handlers::{handle_panic, AppState};
pub use routes::api_routes;

/// Build the application router with all middleware applied
pub fn router(state: Arc<AppState>, config: &ServerConfig) -> Result<Router> {
    let mut app = api_routes()
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(DefaultBodyLimit::max(config.max_body_size));

    if config.cors_enabled {
        app = app.layer(cors_layer(&config.cors_origins)?);
    }

    if config.request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    Ok(app.with_state(state))
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let origins = origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin: {:?}", o))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Start the HTTP inference server
pub async fn start(gateway: Arc<ModelGateway>, config: ServerConfig) -> Result<()> {
    let state = Arc::new(AppState::new(gateway));
    let app = router(state, &config)?;

    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("API endpoints:");
    tracing::info!("  GET  /health  - Health check");
    tracing::info!("  GET  /model   - Model information");
    tracing::info!("  POST /predict - Score a patient record");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_rejects_bad_origin() {
        assert!(cors_layer(&[]).is_ok());
        assert!(cors_layer(&["https://app.example.com".to_string()]).is_ok());
        assert!(cors_layer(&["bad\norigin".to_string()]).is_err());
    }
}
