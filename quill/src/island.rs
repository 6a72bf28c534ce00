//! Editing island: a group of trigger controls bound to the editable region
//!
//! One activation runs one apply cycle:
//!
//! ```text
//! Idle → Validating → Reading → Dispatching → Replacing → Succeeded | Failed
//! ```
//!
//! Failures before `Replacing` never touch the surface. Whatever happens, the
//! island is back in `Idle` when `activate` returns.

use crate::args::resolve_args;
use crate::config::IslandConfig;
use crate::element::{Element, ElementId, ElementTree};
use crate::outcome::{FailureReason, Outcome};
use quill_core::QuillError;
use quill_editor::{RegionId, SelectionError, Surface};
use quill_plugin::{ModifierRegistry, ModifierSource};
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, trace, warn};

/// Stage of an apply cycle, traced as the cycle advances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Idle,
    Validating,
    Reading,
    Dispatching,
    Replacing,
    Succeeded,
    Failed,
}

/// Why an activation did not start a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    /// The island has not been initialized yet
    NotInitialized,
    /// The target is not inside a trigger carrying a modifier id
    NoTrigger,
    /// The surface has no editable region
    NoEditor,
}

/// Result of one activation
#[derive(Debug, Clone, PartialEq)]
pub enum Activation {
    Ignored(Ignored),
    Completed(Outcome),
}

impl Activation {
    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            Activation::Completed(o) => Some(o),
            Activation::Ignored(_) => None,
        }
    }
}

pub struct Island {
    name: String,
    config: IslandConfig,
    tree: ElementTree,
    registry: Option<Arc<ModifierRegistry>>,
    listener: Option<UnboundedSender<Outcome>>,
}

impl Island {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, IslandConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: IslandConfig) -> Self {
        Self {
            name: name.into(),
            config,
            tree: ElementTree::new(Element::new()),
            registry: None,
            listener: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &IslandConfig {
        &self.config
    }

    pub fn elements(&self) -> &ElementTree {
        &self.tree
    }

    pub fn elements_mut(&mut self) -> &mut ElementTree {
        &mut self.tree
    }

    /// Add an element under `parent`
    pub fn append(&mut self, parent: ElementId, element: Element) -> ElementId {
        self.tree.append(parent, element)
    }

    /// Add a trigger for `modifier_id`, optionally with an embedded bag
    pub fn add_trigger(&mut self, modifier_id: &str, args: Option<&str>) -> ElementId {
        let mut element = Element::new().attr(&self.config.modifier_attr, modifier_id);
        if let Some(raw) = args {
            element = element.attr(&self.config.args_attr, raw);
        }
        self.tree.append(ElementId::ROOT, element)
    }

    /// Add an argument source contributing `key`
    pub fn add_arg_source(&mut self, key: &str, element: Element) -> ElementId {
        let element = element.attr(&self.config.arg_source_attr, key);
        self.tree.append(ElementId::ROOT, element)
    }

    pub fn is_initialized(&self) -> bool {
        self.registry.is_some()
    }

    /// Attach the registry and run the one-time bulk load.
    ///
    /// Returns `false` when the island was already initialized; nothing is
    /// loaded again in that case.
    pub async fn init(&mut self, registry: Arc<ModifierRegistry>, sources: &[Arc<dyn ModifierSource>]) -> bool {
        if self.is_initialized() {
            debug!(island = %self.name, "island already initialized");
            return false;
        }

        let outcome = registry.auto_register_all(sources).await;
        debug!(
            island = %self.name,
            first_load = outcome.is_first_load(),
            modifiers = registry.len(),
            "island initialized"
        );
        self.registry = Some(registry);
        true
    }

    /// Receive every outcome this island produces from now on
    pub fn subscribe(&mut self) -> UnboundedReceiver<Outcome> {
        let (tx, rx) = unbounded_channel();
        self.listener = Some(tx);
        rx
    }

    /// Run one apply cycle for a click on `target`
    pub fn activate(&self, target: ElementId, surface: &mut Surface) -> Activation {
        let Some(registry) = self.registry.as_deref() else {
            warn!(island = %self.name, "activation before initialization ignored");
            return Activation::Ignored(Ignored::NotInitialized);
        };

        // Idle: resolve the trigger
        let trigger = self.tree
            .closest(target, &self.config.modifier_attr)
            .and_then(|(_, el)| {
                let id = el.get_attr(&self.config.modifier_attr)?;
                (!id.is_empty()).then_some((el, id))
            });
        let Some((trigger, modifier_id)) = trigger else {
            trace!(island = %self.name, ?target, "no trigger at target");
            return Activation::Ignored(Ignored::NoTrigger);
        };

        let outcome = match self.run_cycle(registry, trigger, modifier_id, surface) {
            Ok(outcome) => outcome,
            Err(ignored) => return Activation::Ignored(ignored),
        };

        self.enter(if outcome.is_applied() { Phase::Succeeded } else { Phase::Failed });
        self.notify(&outcome);
        self.enter(Phase::Idle);
        Activation::Completed(outcome)
    }

    fn run_cycle(
        &self,
        registry: &ModifierRegistry,
        trigger: &Element,
        modifier_id: &str,
        surface: &mut Surface,
    ) -> Result<Outcome, Ignored> {
        self.enter(Phase::Validating);
        let Some(editor) = surface.find_region_by_role(&self.config.editor_role) else {
            debug!(island = %self.name, role = %self.config.editor_role, "no editable region, activation ignored");
            return Err(Ignored::NoEditor);
        };
        let editor = editor.id.clone();
        if let Err(reason) = validate_selection(surface, &editor) {
            return Ok(Outcome::failed(reason));
        }

        self.enter(Phase::Reading);
        let snapshot = match surface.snapshot(&editor) {
            Ok(s) => s,
            Err(SelectionError::OutOfBounds { .. }) => {
                return Ok(Outcome::failed(FailureReason::SelectionNotInsideEditor));
            }
            Err(SelectionError::Empty) => return Ok(Outcome::failed(FailureReason::NoSelection)),
        };

        self.enter(Phase::Dispatching);
        let args = resolve_args(trigger, &self.tree, &self.config);
        let result = match registry.apply_by_id(modifier_id, &snapshot.text, &args) {
            Ok(r) => r,
            Err(e) => {
                warn!(island = %self.name, modifier = modifier_id, error = %e, "modifier failed");
                return Ok(Outcome::Failed {
                    reason: FailureReason::ApplyError,
                    error: Some(QuillError::from(e)),
                });
            }
        };

        self.enter(Phase::Replacing);
        let original = snapshot.text.clone();
        if !surface.replace_snapshot(snapshot, &result) {
            warn!(island = %self.name, "selection changed during apply, replacement skipped");
        }

        Ok(Outcome::Applied {
            id: modifier_id.to_string(),
            args,
            original,
            result,
        })
    }

    fn enter(&self, phase: Phase) {
        trace!(island = %self.name, ?phase, "apply cycle");
    }

    fn notify(&self, outcome: &Outcome) {
        if let Some(ref tx) = self.listener {
            if tx.send(outcome.clone()).is_err() {
                debug!(island = %self.name, event = outcome.event_name(), "outcome listener gone");
            }
        }
    }
}

/// Bounds check of the validating step. A missing selection passes here and
/// is reported as `no-selection` once the text is read.
fn validate_selection(surface: &Surface, editor: &RegionId) -> Result<(), FailureReason> {
    if surface.selection().is_some() && !surface.is_selection_inside(editor) {
        return Err(FailureReason::SelectionNotInsideEditor);
    }
    Ok(())
}
