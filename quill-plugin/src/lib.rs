//! Quill Modifier System
//!
//! Provides the pieces for plugging text transformations into Quill:
//! - `ModifierPlugin` (pure text transformation) and its metadata
//! - `ModifierRegistry` (dispatch by id)
//! - `ModifierSource` (one-time bulk loading)

mod traits;
mod registry;
mod loader;

pub use traits::{ModifierPlugin, ModifierMeta, ArgMeta, MergeMode, FnModifier};
pub use registry::{ModifierRegistry, ModifierError};
pub use loader::{ModifierSource, StaticSource, LoadError, LoadReport, LoadOutcome, SkippedModule};

/// Re-export core types for modifier authors
pub mod prelude {
    pub use crate::{
        ModifierPlugin, ModifierMeta, ArgMeta, MergeMode,
        ModifierRegistry, ModifierSource, StaticSource,
    };
    pub use quill_core::prelude::*;
}
