//! Apply-cycle outcomes
//!
//! Serialized, an outcome is the event external listeners consume:
//! `{"type": "transform:applied", "detail": {...}}` or
//! `{"type": "transform:failed", "detail": {...}}`.

use quill_core::{Args, QuillError};
use serde::Serialize;
use std::fmt;

pub const APPLIED_EVENT: &str = "transform:applied";
pub const FAILED_EVENT: &str = "transform:failed";

/// Why an apply cycle failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    SelectionNotInsideEditor,
    NoSelection,
    ApplyError,
}

impl FailureReason {
    pub fn code(self) -> &'static str {
        match self {
            FailureReason::SelectionNotInsideEditor => "selection-not-inside-editor",
            FailureReason::NoSelection => "no-selection",
            FailureReason::ApplyError => "apply-error",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Terminal signal of one apply cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "detail")]
pub enum Outcome {
    #[serde(rename = "transform:applied")]
    Applied {
        id: String,
        args: Args,
        original: String,
        result: String,
    },
    #[serde(rename = "transform:failed")]
    Failed {
        reason: FailureReason,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<QuillError>,
    },
}

impl Outcome {
    pub fn failed(reason: FailureReason) -> Self {
        Outcome::Failed { reason, error: None }
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            Outcome::Applied { .. } => APPLIED_EVENT,
            Outcome::Failed { .. } => FAILED_EVENT,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied { .. })
    }

    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            Outcome::Failed { reason, .. } => Some(*reason),
            Outcome::Applied { .. } => None,
        }
    }
}
