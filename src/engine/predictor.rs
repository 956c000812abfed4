//! Inference request handling
//!
//! Turns an untyped JSON payload into a validated prediction or a precise
//! [`PredictError`].

use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use serde::Serialize;
use serde_json::{Map, Value};

use super::{ModelGateway, PredictError};
use crate::model::features::{first_missing_field, FeatureVector};

/// Successful prediction response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub death_event: i64,
    /// Probability of the positive class as a percentage, two decimals
    pub confidence: f64,
    pub status: &'static str,
}

/// Validates payloads and dispatches them to the gateway
#[derive(Clone)]
pub struct Predictor {
    gateway: Arc<ModelGateway>,
}

impl Predictor {
    pub fn new(gateway: Arc<ModelGateway>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &ModelGateway {
        &self.gateway
    }

    /// Score one payload
    ///
    /// Availability is checked before anything else, then presence of every
    /// field in feature order (first miss wins). Any later fault is logged
    /// with its full cause chain and reported as [`PredictError::Inference`].
    pub fn handle(&self, payload: &Value) -> Result<PredictionResult, PredictError> {
        if !self.gateway.is_ready() {
            return Err(PredictError::ServiceUnavailable);
        }

        let fields = match payload.as_object() {
            Some(fields) => fields,
            None => {
                return Err(inference_fault(anyhow!(
                    "request body must be a JSON object, got {}",
                    json_type(payload)
                )))
            }
        };

        if let Some(missing) = first_missing_field(fields) {
            return Err(PredictError::MissingField(missing.to_string()));
        }

        self.score(fields).map_err(inference_fault)
    }

    /// Score a raw request body
    ///
    /// The body is only decoded once the gateway is known to be ready, so an
    /// unavailable model is reported ahead of malformed JSON.
    pub fn handle_body(&self, body: &[u8]) -> Result<PredictionResult, PredictError> {
        if !self.gateway.is_ready() {
            return Err(PredictError::ServiceUnavailable);
        }

        let payload: Value = serde_json::from_slice(body)
            .map_err(|e| inference_fault(anyhow!("Failed to decode JSON object: {}", e)))?;

        self.handle(&payload)
    }

    fn score(&self, fields: &Map<String, Value>) -> Result<PredictionResult> {
        let features = FeatureVector::from_payload(fields)?;

        let proba = self.gateway.classify_proba(features.as_slice())?;
        let confidence = confidence_percent(positive_probability(&proba)?);
        let label = self.gateway.classify(features.as_slice())?;

        Ok(PredictionResult {
            death_event: label,
            confidence,
            status: "success",
        })
    }
}

/// Probability of the positive class: index 1, or index 0 for a
/// single-class distribution
///
/// Every entry must be a finite probability in `[0, 1]`.
pub fn positive_probability(proba: &[f64]) -> Result<f64> {
    if let Some(bad) = proba
        .iter()
        .find(|p| !p.is_finite() || !(0.0..=1.0).contains(*p))
    {
        bail!("model returned an invalid probability: {}", bad);
    }

    let p = if proba.len() > 1 {
        proba[1]
    } else {
        *proba
            .first()
            .ok_or_else(|| anyhow!("model returned an empty probability distribution"))?
    };
    Ok(p)
}

/// Scale a probability to a percentage rounded to two decimals
///
/// `f64::round` breaks exact ties away from zero, so a value sitting exactly
/// on a half (0.28625 -> 28.63) can differ by 0.01 from round-half-even.
pub fn confidence_percent(probability: f64) -> f64 {
    (probability * 100.0 * 100.0).round() / 100.0
}

fn inference_fault(err: anyhow::Error) -> PredictError {
    tracing::error!("Prediction error: {:?}", err);
    PredictError::Inference(err.to_string())
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
