//! Prediction error taxonomy

use axum::http::StatusCode;
use thiserror::Error;

/// Why a prediction request failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictError {
    /// The gateway failed to load its model at startup
    #[error("Model not loaded")]
    ServiceUnavailable,

    /// A required field is absent; names the first one in feature order
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Any fault while coercing, scoring or shaping the response
    #[error("{0}")]
    Inference(String),
}

impl PredictError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PredictError::MissingField(_) => StatusCode::BAD_REQUEST,
            PredictError::ServiceUnavailable | PredictError::Inference(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
