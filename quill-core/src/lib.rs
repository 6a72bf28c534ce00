//! Quill Core - Fundamental types
//!
//! This crate provides the core types used throughout Quill:
//! - `ArgValue` / `Args`: flat argument bags handed to modifiers
//! - `QuillError`: structured errors carried by outcome events

mod value;
mod error;

pub use value::{ArgValue, Args, ArgError};
pub use error::{QuillError, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{ArgValue, Args, QuillError};
    pub use crate::error::codes;
}
