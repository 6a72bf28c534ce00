//! Quill - selection-scoped text modifiers
//!
//! Wires trigger controls ("islands") to a modifier registry and an editable
//! text surface. Clicking a trigger transforms exactly the current selection
//! inside the editable region and reports an [`Outcome`].

mod args;
mod config;
mod element;
mod island;
mod outcome;

pub use args::{collect_args, parse_trigger_args, resolve_args, ValueExtraction, EXTRACTION_ORDER};
pub use config::IslandConfig;
pub use element::{Element, ElementId, ElementTree};
pub use island::{Activation, Ignored, Island};
pub use outcome::{FailureReason, Outcome, APPLIED_EVENT, FAILED_EVENT};

pub use quill_core::{ArgValue, Args, QuillError};
pub use quill_editor::{RegionId, Surface};
pub use quill_plugin::{ModifierMeta, ModifierRegistry, ModifierSource};

use std::sync::Arc;
use tracing::info;

/// Main Quill engine
pub struct Quill {
    registry: Arc<ModifierRegistry>,
    sources: Vec<Arc<dyn ModifierSource>>,
    config: IslandConfig,
}

impl Quill {
    pub fn new(registry: ModifierRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            sources: Vec::new(),
            config: IslandConfig::default(),
        }
    }

    /// Empty registry; the bundled modifiers register when the first island
    /// initializes.
    pub fn with_standard_library() -> Self {
        Self::new(ModifierRegistry::new()).with_sources(quill_cipher::cipher_sources())
    }

    pub fn with_sources(mut self, sources: Vec<Arc<dyn ModifierSource>>) -> Self {
        self.sources.extend(sources);
        self
    }

    pub fn with_config(mut self, config: IslandConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &Arc<ModifierRegistry> {
        &self.registry
    }

    /// A new, uninitialized island using this engine's config
    pub fn island(&self, name: impl Into<String>) -> Island {
        Island::with_config(name, self.config.clone())
    }

    pub async fn init_island(&self, island: &mut Island) -> bool {
        island.init(self.registry.clone(), &self.sources).await
    }

    /// Initialize every island; returns how many were newly initialized
    pub async fn init_all(&self, islands: &mut [Island]) -> usize {
        let mut count = 0;
        for island in islands.iter_mut() {
            if self.init_island(island).await {
                count += 1;
            }
        }
        info!(islands = islands.len(), initialized = count, "islands ready");
        count
    }

    pub fn list_modifiers(&self) -> Vec<ModifierMeta> {
        self.registry.list()
    }
}

impl Default for Quill {
    fn default() -> Self {
        Self::with_standard_library()
    }
}
