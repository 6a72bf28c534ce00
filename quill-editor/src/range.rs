//! Char ranges and how they move through an edit

use serde::Serialize;

/// A selection range: `anchor` stays put, `head` is where the cursor is.
/// Positions are char offsets into the surface text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Range {
    pub anchor: usize,
    pub head: usize,
}

impl Range {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    #[inline]
    pub fn point(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    /// Start of the range
    #[inline]
    #[must_use]
    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    /// End of the range
    #[inline]
    #[must_use]
    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.to() - self.from()
    }

    /// A collapsed range is a bare cursor.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }
}

/// Half-open span `[start, end)` of a region, in chars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the whole range lies within this span. Both ends are
    /// inclusive so a cursor sitting at either edge still counts.
    pub fn contains_range(&self, range: &Range) -> bool {
        self.start <= range.from() && range.to() <= self.end
    }

    /// Span after `[from, to)` was replaced by `inserted` chars.
    ///
    /// Text inserted at a region boundary belongs to the region only when
    /// the region covered the replaced range.
    pub(crate) fn map_through(self, edit: &Edit) -> Span {
        let start = edit.map_start(self.start);
        let end = edit.map_end(self.end).max(start);
        Span { start, end }
    }
}

/// A single delete-then-insert
#[derive(Debug, Clone, Copy)]
pub(crate) struct Edit {
    pub from: usize,
    pub to: usize,
    pub inserted: usize,
}

impl Edit {
    fn shift(&self, pos: usize) -> usize {
        pos - (self.to - self.from) + self.inserted
    }

    fn map_start(&self, pos: usize) -> usize {
        if pos <= self.from {
            pos
        } else if pos >= self.to {
            self.shift(pos)
        } else {
            self.from
        }
    }

    fn map_end(&self, pos: usize) -> usize {
        if pos < self.from || (pos == self.from && self.from < self.to) {
            pos
        } else if pos >= self.to {
            self.shift(pos)
        } else {
            self.from + self.inserted
        }
    }
}
