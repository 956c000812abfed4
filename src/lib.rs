//! hfp - heart failure prediction service
//!
//! Loads a pre-trained binary classifier once at startup and scores
//! twelve-field patient records over HTTP.
//!
//! # Architecture
//!
//! - **model**: classifier trait, artifact formats, fixed feature order
//! - **loader**: artifact detection and deserialization
//! - **engine**: model gateway and request validation/dispatch
//! - **server**: axum routes for `/predict`, `/health` and `/model`
//!
//! # Example
//!
//! ```bash
//! # Start server with the bundled model
//! hfp serve --model models/hfp.json --port 5000
//!
//! # Score one record from a file
//! hfp predict --model models/hfp.json --input patient.json
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod loader;
pub mod model;
pub mod server;

// Re-export key types
pub use config::{HfpConfig, ModelConfig, ServerConfig};
pub use engine::{ModelGateway, PredictError, PredictionResult, Predictor};
pub use loader::{load_model, ModelFormat, ModelInfo};
pub use model::{Classifier, FeatureVector, ModelArtifact, FEATURE_NAMES};
