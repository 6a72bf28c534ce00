//! Helper functions for cipher modifiers

use quill_core::Args;

/// Read an integer argument, falling back to `default` when the key is
/// missing or its value is not a finite number. Fractions truncate toward
/// zero; out-of-range values saturate.
pub fn int_arg_or(args: &Args, key: &str, default: i64) -> i64 {
    args.get(key)
        .and_then(|v| v.to_finite_number())
        .map(|n| n.trunc() as i64)
        .unwrap_or(default)
}

/// Rotate a letter within the 26-letter block starting at `base`.
/// `n` may be any integer, including negative ones.
pub fn rotate_letter(c: char, base: char, n: i64) -> char {
    let offset = (c as i64 - base as i64 + n.rem_euclid(26)).rem_euclid(26);
    char::from_u32(base as u32 + offset as u32).unwrap_or(c)
}
