//! Rotating alphabet shift

use crate::helpers::{int_arg_or, rotate_letter};
use quill_plugin::prelude::*;

pub const CAESAR_ID: &str = "caesar.shift";
pub const DEFAULT_SHIFT: i64 = 5;

/// Shift ASCII letters by `n` places, wrapping within each case.
///
/// Iterates by scalar value, so anything outside `A-Z`/`a-z` (digits,
/// punctuation, other scripts, astral-plane characters) passes through.
pub fn caesar_shift(text: &str, n: i64) -> String {
    text.chars()
        .map(|c| match c {
            'A'..='Z' => rotate_letter(c, 'A', n),
            'a'..='z' => rotate_letter(c, 'a', n),
            other => other,
        })
        .collect()
}

// ============ CaesarShift ============

pub struct CaesarShift;

static CAESAR_ARGS: [ArgMeta; 1] = [ArgMeta::optional(
    "shift",
    "number",
    "Places to rotate each letter; negative shifts rotate backwards",
    ArgValue::Number(DEFAULT_SHIFT as f64),
)];

impl ModifierPlugin for CaesarShift {
    fn meta(&self) -> ModifierMeta {
        ModifierMeta {
            id: CAESAR_ID,
            name: "Caesar Shift",
            description: "Rotate Latin letters through the alphabet",
            category: "alphabet",
            default_mode: MergeMode::Flatten,
            args: &CAESAR_ARGS,
        }
    }

    fn apply(&self, text: &str, args: &Args) -> Result<String, QuillError> {
        Ok(caesar_shift(text, int_arg_or(args, "shift", DEFAULT_SHIFT)))
    }
}
