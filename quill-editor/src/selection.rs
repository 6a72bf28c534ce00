//! Selection adapter: read the selection inside a region, replace it in place
//!
//! Every mutation goes through [`Surface::replace_selection`]. It checks
//! containment first and touches nothing when the check fails, so callers can
//! rely on "either exactly the new text replaced the selection, or the
//! document is unchanged".

use crate::range::Range;
use crate::surface::{RegionId, Surface};
use thiserror::Error;
use tracing::trace;

/// Why a selection cannot be acted upon
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Selection is not inside region '{region}'")]
    OutOfBounds { region: RegionId },

    #[error("Nothing is selected")]
    Empty,
}

/// The selection as captured for one apply cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSnapshot {
    pub region: RegionId,
    pub text: String,
    range: Range,
}

impl SelectionSnapshot {
    pub fn range(&self) -> Range {
        self.range
    }
}

impl Surface {
    /// True only when there is a selection and it lies within `region`
    pub fn is_selection_inside(&self, region: &RegionId) -> bool {
        match (self.selection(), self.region(region)) {
            (Some(range), Some(r)) => r.span.contains_range(&range),
            _ => false,
        }
    }

    /// Text of the current selection, or empty when there is none
    pub fn selected_text(&self) -> String {
        self.selection()
            .map(|range| self.slice(range))
            .unwrap_or_default()
    }

    /// Capture the selection for an apply cycle.
    ///
    /// No selection at all counts as an empty one; a selection outside the
    /// region is out of bounds even when collapsed.
    pub fn snapshot(&self, region: &RegionId) -> Result<SelectionSnapshot, SelectionError> {
        let range = self.selection().ok_or(SelectionError::Empty)?;
        if !self.is_selection_inside(region) {
            return Err(SelectionError::OutOfBounds { region: region.clone() });
        }
        let text = self.slice(range);
        if text.is_empty() {
            return Err(SelectionError::Empty);
        }
        Ok(SelectionSnapshot { region: region.clone(), text, range })
    }

    /// Replace the selection with `new_text`.
    ///
    /// Returns `false` without touching the document when there is no
    /// selection or it is outside `region`. On success the selection collapses
    /// just after the inserted text and `region` takes focus. Identical text
    /// is still deleted and reinserted.
    pub fn replace_selection(&mut self, region: &RegionId, new_text: &str) -> bool {
        let Some(range) = self.selection() else {
            return false;
        };
        if !self.is_selection_inside(region) {
            return false;
        }

        trace!(from = range.from(), to = range.to(), inserted = new_text.len(), "replacing selection");
        self.splice(range, new_text);
        self.focus(region);
        true
    }

    /// Replace the range captured in `snapshot`. Fails like
    /// [`replace_selection`](Self::replace_selection) if the selection moved
    /// since the snapshot was taken.
    pub fn replace_snapshot(&mut self, snapshot: SelectionSnapshot, new_text: &str) -> bool {
        if self.selection() != Some(snapshot.range) {
            return false;
        }
        self.replace_selection(&snapshot.region, new_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::Span;

    fn editor() -> RegionId {
        RegionId::new("editor")
    }

    fn page() -> Surface {
        Surface::new("Title\nHello, World!\nFooter")
            .with_region("editor", Some("editor"), 6, 19)
            .unwrap()
    }

    #[test]
    fn test_no_selection() {
        let surface = page();
        assert!(!surface.is_selection_inside(&editor()));
        assert_eq!(surface.selected_text(), "");
        assert_eq!(surface.snapshot(&editor()), Err(SelectionError::Empty));
    }

    #[test]
    fn test_selection_inside() {
        let mut surface = page();
        surface.select(6, 11).unwrap();
        assert!(surface.is_selection_inside(&editor()));
        assert_eq!(surface.selected_text(), "Hello");
    }

    #[test]
    fn test_backwards_selection_reads_forwards() {
        let mut surface = page();
        surface.select(11, 6).unwrap();
        assert_eq!(surface.selected_text(), "Hello");
    }

    #[test]
    fn test_selection_straddling_region_is_outside() {
        let mut surface = page();
        surface.select(2, 10).unwrap();
        assert!(!surface.is_selection_inside(&editor()));
        assert_eq!(
            surface.snapshot(&editor()),
            Err(SelectionError::OutOfBounds { region: editor() })
        );
    }

    #[test]
    fn test_unknown_region_is_never_inside() {
        let mut surface = page();
        surface.select(6, 11).unwrap();
        assert!(!surface.is_selection_inside(&RegionId::new("missing")));
    }

    #[test]
    fn test_collapsed_selection_inside_is_empty() {
        let mut surface = page();
        surface.select(8, 8).unwrap();
        assert!(surface.is_selection_inside(&editor()));
        assert_eq!(surface.snapshot(&editor()), Err(SelectionError::Empty));
    }

    #[test]
    fn test_replace_selection() {
        let mut surface = page();
        surface.select(6, 19).unwrap();
        assert!(surface.replace_selection(&editor(), "Mjqqt, Btwqi!"));
        assert_eq!(surface.text(), "Title\nMjqqt, Btwqi!\nFooter");
        assert_eq!(surface.selection().unwrap(), Range::point(19));
        assert_eq!(surface.focused(), Some(&editor()));
    }

    #[test]
    fn test_replace_outside_region_leaves_document_unchanged() {
        let mut surface = page();
        surface.select(0, 5).unwrap();
        let before = surface.text();
        assert!(!surface.replace_selection(&editor(), "XXX"));
        assert_eq!(surface.text(), before);
        assert_eq!(surface.selection(), Some(Range::new(0, 5)));
        assert!(surface.focused().is_none());
    }

    #[test]
    fn test_replace_without_selection_fails() {
        let mut surface = page();
        assert!(!surface.replace_selection(&editor(), "XXX"));
        assert_eq!(surface.text(), "Title\nHello, World!\nFooter");
    }

    #[test]
    fn test_replace_with_empty_text_collapses_to_point() {
        let mut surface = page();
        surface.select(11, 12).unwrap();
        assert!(surface.replace_selection(&editor(), ""));
        assert_eq!(surface.text(), "Title\nHello World!\nFooter");
        assert_eq!(surface.selection(), Some(Range::point(11)));
        assert_eq!(surface.region(&editor()).unwrap().span, Span::new(6, 18));
    }

    #[test]
    fn test_replace_with_identical_text_still_replaces() {
        let mut surface = page();
        surface.select(6, 11).unwrap();
        assert!(surface.replace_selection(&editor(), "Hello"));
        assert_eq!(surface.text(), "Title\nHello, World!\nFooter");
        // The cursor moved to the end of the reinserted text.
        assert_eq!(surface.selection(), Some(Range::point(11)));
    }

    #[test]
    fn test_replace_grows_region_and_shifts_followers() {
        let mut surface = page()
            .with_region("footer", None, 20, 26)
            .unwrap();
        surface.select(6, 11).unwrap();
        assert!(surface.replace_selection(&editor(), "Goodbye"));
        assert_eq!(surface.region_text(&editor()).unwrap(), "Goodbye, World!");
        assert_eq!(surface.region_text(&"footer".into()).unwrap(), "Footer");
    }

    #[test]
    fn test_replace_snapshot_requires_unchanged_selection() {
        let mut surface = page();
        surface.select(6, 11).unwrap();
        let snapshot = surface.snapshot(&editor()).unwrap();
        assert_eq!(snapshot.text, "Hello");

        surface.select(13, 18).unwrap();
        assert!(!surface.replace_snapshot(snapshot.clone(), "Howdy"));

        surface.select(6, 11).unwrap();
        assert!(surface.replace_snapshot(snapshot, "Howdy"));
        assert_eq!(surface.region_text(&editor()).unwrap(), "Howdy, World!");
    }
}
