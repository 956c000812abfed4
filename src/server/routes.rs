//! Route definitions

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{health, model_info, predict, AppState};

/// Create the API router
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Liveness
        .route("/health", get(health))
        // Inference
        .route("/predict", post(predict))
        .route("/model", get(model_info))
}
