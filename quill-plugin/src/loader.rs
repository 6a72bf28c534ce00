//! Bulk loading of modifier modules
//!
//! Modules are enumerated up front as [`ModifierSource`]s. Loading one may
//! suspend; each yields at most one descriptor.

use crate::ModifierPlugin;
use async_trait::async_trait;
use quill_core::{codes, QuillError};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Error raised while loading a single module
#[derive(Debug, Clone, Error)]
#[error("failed to load modifier module '{module}': {reason}")]
pub struct LoadError {
    pub module: String,
    pub reason: String,
}

impl LoadError {
    pub fn new(module: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { module: module.into(), reason: reason.into() }
    }
}

impl From<LoadError> for QuillError {
    fn from(err: LoadError) -> Self {
        QuillError::new(codes::MODULE_LOAD, err.to_string())
    }
}

/// A loadable unit that may expose a modifier descriptor
#[async_trait]
pub trait ModifierSource: Send + Sync {
    fn name(&self) -> &str;
    async fn load(&self) -> Result<Option<Arc<dyn ModifierPlugin>>, LoadError>;
}

/// Source backed by a compiled-in factory
pub struct StaticSource {
    name: &'static str,
    factory: fn() -> Arc<dyn ModifierPlugin>,
}

impl StaticSource {
    pub const fn new(name: &'static str, factory: fn() -> Arc<dyn ModifierPlugin>) -> Self {
        Self { name, factory }
    }
}

#[async_trait]
impl ModifierSource for StaticSource {
    fn name(&self) -> &str {
        self.name
    }

    async fn load(&self) -> Result<Option<Arc<dyn ModifierPlugin>>, LoadError> {
        Ok(Some((self.factory)()))
    }
}

/// Module that was not registered, and why
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedModule {
    pub module: String,
    pub error: QuillError,
}

/// Result of the bulk registration pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub registered: Vec<String>,
    pub skipped: Vec<SkippedModule>,
}

/// What a call to `auto_register_all` did
#[derive(Debug, Clone, Copy)]
pub enum LoadOutcome<'a> {
    /// This call performed the load
    Loaded(&'a LoadReport),
    /// An earlier call already loaded; nothing was touched
    AlreadyLoaded(&'a LoadReport),
}

impl<'a> LoadOutcome<'a> {
    pub fn report(&self) -> &'a LoadReport {
        match self {
            LoadOutcome::Loaded(r) | LoadOutcome::AlreadyLoaded(r) => r,
        }
    }

    pub fn is_first_load(&self) -> bool {
        matches!(self, LoadOutcome::Loaded(_))
    }
}
