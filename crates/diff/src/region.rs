use derive_more::Display;
use std::ops::Range;

use crate::line::Line;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Classification of a single output row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RowKind {
    /// Both sides are real and carry the same text
    #[display(fmt = "Unchanged")]
    Unchanged,

    /// The base side is a placeholder
    #[display(fmt = "Added")]
    Added,

    /// The modified side is a placeholder
    #[display(fmt = "Deleted")]
    Deleted,

    /// Both sides are real but the text differs
    #[display(fmt = "Changed")]
    Changed,
}

impl RowKind {
    /// Classify a pair of lines sharing one visual row
    pub fn classify(base: &Line, modified: &Line) -> Self {
        match (base.is_placeholder(), modified.is_placeholder()) {
            (true, _) => RowKind::Added,
            (false, true) => RowKind::Deleted,
            (false, false) if base.text() != modified.text() => RowKind::Changed,
            (false, false) => RowKind::Unchanged,
        }
    }

    pub fn is_change(self) -> bool {
        self != RowKind::Unchanged
    }
}

/// Whether a row is rendered as a change and so belongs to a region.
///
/// Broader than [`RowKind::classify`]: two real lines with equal text still
/// count when their runs mark edits, as a `- c` / `+ c` pair does.
pub fn is_change_row(base: &Line, modified: &Line) -> bool {
    RowKind::classify(base, modified).is_change() || base.has_edits() || modified.has_edits()
}

/// Summary of the rows inside a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RegionKind {
    /// Every row is an added line
    #[display(fmt = "Added")]
    Added,

    /// Every row is a deleted line
    #[display(fmt = "Deleted")]
    Deleted,

    /// Mixed rows, or rows changed in place
    #[display(fmt = "Changed")]
    Changed,
}

impl RegionKind {
    pub(crate) fn from_row(kind: RowKind) -> Self {
        match kind {
            RowKind::Added => RegionKind::Added,
            RowKind::Deleted => RegionKind::Deleted,
            RowKind::Changed | RowKind::Unchanged => RegionKind::Changed,
        }
    }

    /// The kind of a region after `row` has been appended to it
    pub(crate) fn merge(self, row: RowKind) -> Self {
        let row = Self::from_row(row);
        if self == row {
            self
        } else {
            RegionKind::Changed
        }
    }
}

/// A maximal block of contiguous changed rows
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Region {
    pub(crate) index: usize,
    pub(crate) rows: Range<usize>,
    pub(crate) kind: RegionKind,
}

impl Region {
    pub(crate) fn open(index: usize, row: usize, kind: RowKind) -> Self {
        Self {
            index,
            rows: row..row + 1,
            kind: RegionKind::from_row(kind),
        }
    }

    pub(crate) fn extend(&mut self, kind: RowKind) {
        self.rows.end += 1;
        self.kind = self.kind.merge(kind);
    }

    /// Position of the region in discovery order
    pub fn index(&self) -> usize {
        self.index
    }

    /// The half-open range of rows covered by the region
    pub fn rows(&self) -> Range<usize> {
        self.rows.clone()
    }

    pub fn kind(&self) -> RegionKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, row: usize) -> bool {
        self.rows.contains(&row)
    }
}
