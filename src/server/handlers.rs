//! HTTP request handlers

use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::engine::{ModelGateway, PredictError, Predictor};
use crate::model::{ModelKind, FEATURE_NAMES};

/// Shared application state
pub struct AppState {
    pub predictor: Predictor,
}

impl AppState {
    pub fn new(gateway: Arc<ModelGateway>) -> Self {
        Self {
            predictor: Predictor::new(gateway),
        }
    }
}

/// Liveness probe; always 200, whatever the model state
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy",
        model_loaded: state.predictor.gateway().is_ready(),
    };
    (StatusCode::OK, Json(response))
}

/// Score a feature record
pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) if state.predictor.gateway().is_ready() => {
            tracing::error!("Prediction error: {}", rejection.body_text());
            let body = ErrorResponse {
                error: rejection.body_text(),
            };
            return (rejection.status(), Json(body)).into_response();
        }
        Err(_) => return error_response(&PredictError::ServiceUnavailable),
    };

    match state.predictor.handle_body(&body) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Describe the loaded model and the expected feature order
pub async fn model_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let gateway = state.predictor.gateway();
    let info = gateway.info();

    let response = ModelResponse {
        model_loaded: gateway.is_ready(),
        reason: gateway.unavailable_reason().map(str::to_string),
        kind: info.map(|i| i.kind),
        n_features: info.map(|i| i.n_features),
        classes: info.map(|i| i.classes.clone()),
        name: info.and_then(|i| i.name.clone()),
        version: info.and_then(|i| i.version.clone()),
        features: FEATURE_NAMES.to_vec(),
    };
    (StatusCode::OK, Json(response))
}

fn error_response(err: &PredictError) -> Response {
    let body = ErrorResponse {
        error: err.to_string(),
    };
    (err.status_code(), Json(body)).into_response()
}

/// Turn a handler panic into a 500 instead of dropping the connection
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!("Handler panicked: {}", detail);

    let body = ErrorResponse { error: detail };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

// Response types

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct ModelResponse {
    pub model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ModelKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_features: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub features: Vec<&'static str>,
}
