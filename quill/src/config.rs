//! Island configuration
//!
//! Attribute names an island looks for on its elements, and the role that
//! marks the editable region on the surface.

use serde::Deserialize;

pub const DEFAULT_MODIFIER_ATTR: &str = "data-modifier-id";
pub const DEFAULT_ARGS_ATTR: &str = "data-args";
pub const DEFAULT_ARG_SOURCE_ATTR: &str = "data-arg";
pub const DEFAULT_VALUE_ATTR: &str = "data-value";
pub const DEFAULT_EDITOR_ROLE: &str = "editor";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IslandConfig {
    /// Marks a trigger; its value is the modifier id
    pub modifier_attr: String,
    /// Serialized argument bag on a trigger
    pub args_attr: String,
    /// Marks an argument source; its value is the argument key
    pub arg_source_attr: String,
    /// Fallback value of an argument source
    pub value_attr: String,
    /// Role of the editable region
    pub editor_role: String,
}

impl IslandConfig {
    pub fn with_editor_role(mut self, role: impl Into<String>) -> Self {
        self.editor_role = role.into();
        self
    }

    pub fn with_modifier_attr(mut self, attr: impl Into<String>) -> Self {
        self.modifier_attr = attr.into();
        self
    }
}

impl Default for IslandConfig {
    fn default() -> Self {
        Self {
            modifier_attr: DEFAULT_MODIFIER_ATTR.to_string(),
            args_attr: DEFAULT_ARGS_ATTR.to_string(),
            arg_source_attr: DEFAULT_ARG_SOURCE_ATTR.to_string(),
            value_attr: DEFAULT_VALUE_ATTR.to_string(),
            editor_role: DEFAULT_EDITOR_ROLE.to_string(),
        }
    }
}
