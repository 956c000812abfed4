//! Core inference engine
//!
//! - ModelGateway: owns the classifier loaded at startup
//! - Predictor: validates request payloads and dispatches them to the gateway

mod error;
mod gateway;
mod predictor;

pub use error::PredictError;
pub use gateway::ModelGateway;
pub use predictor::{confidence_percent, positive_probability, PredictionResult, Predictor};
