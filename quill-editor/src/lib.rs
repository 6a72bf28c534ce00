//! Quill Editor Surface
//!
//! Text storage and the selection semantics modifiers are applied through:
//! - `Surface`: rope-backed text, named regions, a single selection
//! - the selection adapter (`is_selection_inside`, `selected_text`,
//!   `replace_selection`) implemented on `Surface`

mod range;
mod surface;
mod selection;

pub use range::{Range, Span};
pub use surface::{Surface, SurfaceError, Region, RegionId};
pub use selection::{SelectionError, SelectionSnapshot};
