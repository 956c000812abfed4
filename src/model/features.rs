//! Feature schema shared with the model artifact
//!
//! The classifier was fitted on a twelve-column matrix in exactly the order
//! of [`FEATURE_NAMES`]. Input key order never matters; output column order
//! always does.

use anyhow::{anyhow, bail, Result};
use serde_json::{Map, Value};

/// Number of input columns the classifier expects
pub const N_FEATURES: usize = 12;

/// Column order of the feature vector
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "age",
    "anaemia",
    "creatinine_phosphokinase",
    "diabetes",
    "ejection_fraction",
    "high_blood_pressure",
    "platelets",
    "serum_creatinine",
    "serum_sodium",
    "sex",
    "smoking",
    "time",
];

/// Fields encoded as 0/1 integers
pub const BINARY_FEATURES: [&str; 5] = [
    "anaemia",
    "diabetes",
    "high_blood_pressure",
    "sex",
    "smoking",
];

/// Whether a field is a boolean-as-int flag
pub fn is_binary_feature(name: &str) -> bool {
    BINARY_FEATURES.contains(&name)
}

/// Return the first required field absent from the payload, if any
pub fn first_missing_field(payload: &Map<String, Value>) -> Option<&'static str> {
    FEATURE_NAMES
        .iter()
        .copied()
        .find(|name| !payload.contains_key(*name))
}

/// Ordered numeric encoding of a feature record
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector([f64; N_FEATURES]);

impl FeatureVector {
    /// Build the vector from a payload whose fields are all present
    ///
    /// Binary flags are coerced to integers; everything else is read as a
    /// plain number. Values that cannot be coerced are errors naming the field.
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self> {
        let mut values = [0.0; N_FEATURES];

        for (slot, name) in values.iter_mut().zip(FEATURE_NAMES) {
            let value = payload
                .get(name)
                .ok_or_else(|| anyhow!("Missing field: {}", name))?;

            *slot = if is_binary_feature(name) {
                coerce_int(name, value)? as f64
            } else {
                coerce_float(name, value)?
            };
        }

        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl From<[f64; N_FEATURES]> for FeatureVector {
    fn from(values: [f64; N_FEATURES]) -> Self {
        Self(values)
    }
}

fn coerce_int(name: &str, value: &Value) -> Result<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            let f = n
                .as_f64()
                .ok_or_else(|| anyhow!("invalid integer for {}: {}", name, n))?;
            if !f.is_finite() || f.abs() >= i64::MAX as f64 {
                bail!("invalid integer for {}: {}", name, n);
            }
            Ok(f.trunc() as i64)
        }
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| anyhow!("invalid integer for {}: {:?}", name, s)),
        other => bail!("invalid integer for {}: {}", name, other),
    }
}

fn coerce_float(name: &str, value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| anyhow!("could not convert {} to float: {}", name, n)),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| anyhow!("could not convert {} to float: {:?}", name, s)),
        other => bail!("could not convert {} to float: {}", name, other),
    }
}
