//! Quill Cipher Modifiers
//!
//! Alphabet ciphers usable as selection modifiers. All modifiers are total:
//! bad arguments fall back to defaults instead of failing.

mod helpers;
mod caesar;

pub use caesar::{caesar_shift, CaesarShift, CAESAR_ID, DEFAULT_SHIFT};

use quill_plugin::{ModifierPlugin, ModifierRegistry, ModifierSource, StaticSource};
use std::sync::Arc;

/// Load cipher modifiers into registry
pub fn load_cipher_library(registry: ModifierRegistry) -> ModifierRegistry {
    registry
        .with_modifier(CaesarShift)
}

/// Cipher modifiers as loadable modules, for `auto_register_all`
pub fn cipher_sources() -> Vec<Arc<dyn ModifierSource>> {
    vec![
        Arc::new(StaticSource::new("caesar", || Arc::new(CaesarShift) as Arc<dyn ModifierPlugin>)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::Args;

    #[test]
    fn test_load_cipher_library() {
        let registry = load_cipher_library(ModifierRegistry::new());
        assert!(registry.contains(CAESAR_ID));
        let out = registry.apply_by_id(CAESAR_ID, "Hello, World!", &Args::new()).unwrap();
        assert_eq!(out, "Mjqqt, Btwqi!");
    }

    #[tokio::test]
    async fn test_cipher_sources_register() {
        let registry = ModifierRegistry::new();
        let outcome = registry.auto_register_all(&cipher_sources()).await;
        assert_eq!(outcome.report().registered, vec![CAESAR_ID.to_string()]);
        assert!(outcome.report().skipped.is_empty());
    }
}
