//! Modifier traits

use quill_core::{ArgValue, Args, QuillError};
use serde::Serialize;

/// Metadata about a modifier argument
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgMeta {
    pub key: &'static str,
    #[serde(rename = "type")]
    pub typ: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<ArgValue>,
}

impl ArgMeta {
    pub const fn required(key: &'static str, typ: &'static str, description: &'static str) -> Self {
        Self { key, typ, description, default: None }
    }

    pub const fn optional(key: &'static str, typ: &'static str, description: &'static str, default: ArgValue) -> Self {
        Self { key, typ, description, default: Some(default) }
    }
}

/// How a modifier result is merged back into the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    /// Replace the whole selection with the result
    #[default]
    Flatten,
}

/// Metadata for a modifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModifierMeta {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub default_mode: MergeMode,
    pub args: &'static [ArgMeta],
}

/// Pure text transformation.
///
/// `apply` must not depend on anything but its inputs; it never sees the
/// document or the selection.
pub trait ModifierPlugin: Send + Sync {
    fn meta(&self) -> ModifierMeta;
    fn apply(&self, text: &str, args: &Args) -> Result<String, QuillError>;
}

/// Modifier backed by a plain function, for ad-hoc registration
pub struct FnModifier<F> {
    meta: ModifierMeta,
    f: F,
}

impl<F> FnModifier<F>
where
    F: Fn(&str, &Args) -> Result<String, QuillError> + Send + Sync,
{
    pub fn new(meta: ModifierMeta, f: F) -> Self {
        Self { meta, f }
    }
}

impl<F> ModifierPlugin for FnModifier<F>
where
    F: Fn(&str, &Args) -> Result<String, QuillError> + Send + Sync,
{
    fn meta(&self) -> ModifierMeta {
        self.meta.clone()
    }

    fn apply(&self, text: &str, args: &Args) -> Result<String, QuillError> {
        (self.f)(text, args)
    }
}
