//! Structured errors carried by outcome events
//!
//! Typed errors live next to the code that raises them. Anything that must
//! cross the orchestrator boundary is converted into a `QuillError`, which is
//! cloneable and serializable so it can ride along in a failure outcome.

use crate::ArgError;
use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_DESCRIPTOR: &str = "INVALID_DESCRIPTOR";
    pub const UNKNOWN_MODIFIER: &str = "UNKNOWN_MODIFIER";
    pub const MODIFIER_FAILED: &str = "MODIFIER_FAILED";
    pub const MODULE_LOAD: &str = "MODULE_LOAD";
    pub const ARG_TYPE: &str = "ARG_TYPE";
    pub const ARG_PARSE: &str = "ARG_PARSE";
}

/// Structured error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuillError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// The error this one wraps, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<QuillError>>,
}

impl QuillError {
    /// Create a new error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            cause: None,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: attach the underlying cause
    pub fn with_cause(mut self, cause: QuillError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Innermost error of the cause chain
    pub fn root_cause(&self) -> &QuillError {
        let mut current = self;
        while let Some(next) = current.cause.as_deref() {
            current = next;
        }
        current
    }
}

impl std::fmt::Display for QuillError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for QuillError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_deref().map(|c| c as &(dyn std::error::Error + 'static))
    }
}

impl From<ArgError> for QuillError {
    fn from(err: ArgError) -> Self {
        Self::new(codes::ARG_PARSE, err.to_string())
            .with_suggestion("Argument bags are flat JSON objects, e.g. {\"shift\": 3}")
    }
}
