//! Wire types: one JSON request per input line, one JSON response per
//! output line.

use quill::IslandConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

#[derive(Debug, Deserialize)]
pub struct RegionSpec {
    pub id: String,
    #[serde(default)]
    pub role: Option<String>,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Deserialize)]
pub struct TriggerSpec {
    pub modifier: String,
    /// Serialized argument bag, passed through verbatim
    #[serde(default)]
    pub args: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ArgSourceSpec {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub data_value: Option<String>,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    /// Load a surface and build the island around it
    Open {
        text: String,
        #[serde(default)]
        regions: Vec<RegionSpec>,
        #[serde(default)]
        triggers: Vec<TriggerSpec>,
        #[serde(default)]
        arg_sources: Vec<ArgSourceSpec>,
        #[serde(default)]
        config: Option<IslandConfig>,
    },
    Select { anchor: usize, head: usize },
    Deselect,
    /// Change the input value of an argument source
    SetArg { key: String, value: String },
    /// Activate the trigger bound to `modifier`
    Click { modifier: String },
    List,
    Text,
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn ok(result: JsonValue) -> Self {
        Self { ok: true, result: Some(result), error: None }
    }

    pub fn err(err: impl std::fmt::Display) -> Self {
        Self { ok: false, result: None, error: Some(err.to_string()) }
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No surface open; send an 'open' request first")]
    NotOpen,

    #[error("No trigger for modifier '{0}'")]
    NoSuchTrigger(String),

    #[error("No argument source '{0}'")]
    NoSuchArgSource(String),

    #[error(transparent)]
    Surface(#[from] quill_editor::SurfaceError),
}
