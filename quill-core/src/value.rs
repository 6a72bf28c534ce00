//! Argument values passed to modifiers
//!
//! An argument bag is flat: every key maps to a primitive. Values arrive
//! either as structured JSON embedded on a trigger or as plain text scanned
//! from argument-source elements, so numeric coercion from text is part of
//! the contract.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use thiserror::Error;

/// Error type for argument bag parsing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgError {
    #[error("Invalid JSON in argument bag: {0}")]
    Malformed(String),

    #[error("Argument bag must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Primitive argument value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ArgValue {
    /// Coerce to a finite number.
    ///
    /// Text is trimmed and parsed; blank text, `NaN` and infinities yield
    /// `None`. Booleans count as 1 and 0.
    pub fn to_finite_number(&self) -> Option<f64> {
        let n = match self {
            ArgValue::Number(n) => *n,
            ArgValue::Bool(b) => if *b { 1.0 } else { 0.0 },
            ArgValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok()?
            }
            ArgValue::Null => return None,
        };
        n.is_finite().then_some(n)
    }

    /// Convert a JSON value. Nested arrays and objects keep their JSON text
    /// so the bag stays flat.
    pub fn from_json(json: &JsonValue) -> Self {
        match json {
            JsonValue::Null => ArgValue::Null,
            JsonValue::Bool(b) => ArgValue::Bool(*b),
            JsonValue::Number(n) => n.as_f64().map(ArgValue::Number).unwrap_or(ArgValue::Null),
            JsonValue::String(s) => ArgValue::Text(s.clone()),
            nested => ArgValue::Text(nested.to_string()),
        }
    }
}

impl From<f64> for ArgValue {
    fn from(n: f64) -> Self {
        ArgValue::Number(n)
    }
}

impl From<i32> for ArgValue {
    fn from(n: i32) -> Self {
        ArgValue::Number(f64::from(n))
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Text(s.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::Text(s)
    }
}

/// Argument bag: parameter key to primitive value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Args(BTreeMap<String, ArgValue>);

impl Args {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder: add a key
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ArgValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Parse a serialized bag. Only a JSON object is accepted.
    pub fn from_json_str(raw: &str) -> Result<Self, ArgError> {
        let json: JsonValue =
            serde_json::from_str(raw).map_err(|e| ArgError::Malformed(e.to_string()))?;
        match json {
            JsonValue::Object(map) => Ok(Self(
                map.iter()
                    .map(|(k, v)| (k.clone(), ArgValue::from_json(v)))
                    .collect(),
            )),
            JsonValue::Null => Err(ArgError::NotAnObject("null")),
            JsonValue::Bool(_) => Err(ArgError::NotAnObject("bool")),
            JsonValue::Number(_) => Err(ArgError::NotAnObject("number")),
            JsonValue::String(_) => Err(ArgError::NotAnObject("string")),
            JsonValue::Array(_) => Err(ArgError::NotAnObject("array")),
        }
    }
}
