//! Editable text surface
//!
//! A `Surface` is the whole text the user sees, backed by a [`ropey::Rope`],
//! with named regions laid over it and at most one selection. Regions mark
//! the parts of the text that may be edited; the selection may fall anywhere.

use crate::range::{Edit, Range, Span};
use ropey::Rope;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Error type for building a surface
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("Position {pos} is past the end of the text ({len} chars)")]
    PositionOutOfRange { pos: usize, len: usize },

    #[error("Region span {start}..{end} is inverted")]
    InvertedSpan { start: usize, end: usize },

    #[error("Region '{0}' already exists")]
    DuplicateRegion(RegionId),
}

/// Stable identity of a region
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A named span of the surface text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub id: RegionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub span: Span,
}

impl Region {
    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Surface {
    text: Rope,
    regions: Vec<Region>,
    selection: Option<Range>,
    focused: Option<RegionId>,
}

impl Surface {
    pub fn new(text: &str) -> Self {
        Self {
            text: Rope::from_str(text),
            ..Self::default()
        }
    }

    /// Builder: add a region
    pub fn with_region(
        mut self,
        id: impl Into<RegionId>,
        role: Option<&str>,
        start: usize,
        end: usize,
    ) -> Result<Self, SurfaceError> {
        self.add_region(id, role, start, end)?;
        Ok(self)
    }

    pub fn add_region(
        &mut self,
        id: impl Into<RegionId>,
        role: Option<&str>,
        start: usize,
        end: usize,
    ) -> Result<(), SurfaceError> {
        let id = id.into();
        if start > end {
            return Err(SurfaceError::InvertedSpan { start, end });
        }
        self.check_pos(end)?;
        if self.region(&id).is_some() {
            return Err(SurfaceError::DuplicateRegion(id));
        }
        self.regions.push(Region {
            id,
            role: role.map(str::to_string),
            span: Span::new(start, end),
        });
        Ok(())
    }

    pub fn region(&self, id: &RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| &r.id == id)
    }

    /// First region carrying `role`, in insertion order
    pub fn find_region_by_role(&self, role: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.has_role(role))
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region_text(&self, id: &RegionId) -> Option<String> {
        self.region(id)
            .map(|r| self.text.slice(r.span.start..r.span.end).to_string())
    }

    /// Select from `anchor` to `head`, replacing any previous selection
    pub fn select(&mut self, anchor: usize, head: usize) -> Result<(), SurfaceError> {
        self.check_pos(anchor)?;
        self.check_pos(head)?;
        self.selection = Some(Range::new(anchor, head));
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<Range> {
        self.selection
    }

    pub fn focused(&self) -> Option<&RegionId> {
        self.focused.as_ref()
    }

    pub fn text(&self) -> String {
        self.text.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.text.len_chars()
    }

    pub(crate) fn slice(&self, range: Range) -> String {
        self.text.slice(range.from()..range.to()).to_string()
    }

    pub(crate) fn focus(&mut self, id: &RegionId) {
        self.focused = Some(id.clone());
    }

    /// Replace `range` with `new_text` and collapse the selection after it.
    /// Region spans follow the edit.
    pub(crate) fn splice(&mut self, range: Range, new_text: &str) {
        let edit = Edit {
            from: range.from(),
            to: range.to(),
            inserted: new_text.chars().count(),
        };

        self.text.remove(edit.from..edit.to);
        self.text.insert(edit.from, new_text);

        for region in &mut self.regions {
            region.span = region.span.map_through(&edit);
        }
        self.selection = Some(Range::point(edit.from + edit.inserted));
    }

    fn check_pos(&self, pos: usize) -> Result<(), SurfaceError> {
        let len = self.text.len_chars();
        if pos > len {
            return Err(SurfaceError::PositionOutOfRange { pos, len });
        }
        Ok(())
    }
}
