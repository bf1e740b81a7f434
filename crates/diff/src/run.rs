use derive_more::Display;
use smallvec::SmallVec;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DiffError, Result};

/// How a span of characters relates to the other side of the diff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RunCategory {
    /// The characters are identical on both sides
    #[display(fmt = "Unchanged")]
    Unchanged,

    /// The characters only exist on the modified side
    #[display(fmt = "Added")]
    Added,

    /// The characters only exist on the base side
    #[display(fmt = "Deleted")]
    Deleted,

    /// The characters exist on both sides but differ
    #[display(fmt = "Changed")]
    Changed,
}

impl RunCategory {
    /// Decode one character of an ndiff hint line
    pub fn from_mark(mark: char) -> Option<Self> {
        match mark {
            ' ' => Some(Self::Unchanged),
            '-' => Some(Self::Deleted),
            '+' => Some(Self::Added),
            '^' => Some(Self::Changed),
            _ => None,
        }
    }

    /// The ndiff hint character for this category
    pub fn mark(self) -> char {
        match self {
            Self::Unchanged => ' ',
            Self::Deleted => '-',
            Self::Added => '+',
            Self::Changed => '^',
        }
    }
}

/// A contiguous span of characters within one rendered line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Run {
    /// Zero-based character offset into the line
    pub start: usize,

    /// Number of characters covered, never zero in a built descriptor
    pub length: usize,

    pub category: RunCategory,
}

impl Run {
    pub fn new(start: usize, length: usize, category: RunCategory) -> Self {
        Self {
            start,
            length,
            category,
        }
    }

    /// Offset one past the last character of the run
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.category, self.start, self.length)
    }
}

/// Runs of a single line. Almost every line has one or two.
pub type Runs = SmallVec<[Run; 2]>;

/// A single run covering `len` characters, or no runs for an empty line.
pub(crate) fn whole_line(len: usize, category: RunCategory) -> Runs {
    let mut runs = Runs::new();
    if len > 0 {
        runs.push(Run::new(0, len, category));
    }
    runs
}

/// Collapse per-character hint marks into runs covering `line_len` characters.
///
/// Marks beyond the end of the hint are treated as unchanged, since ndiff
/// strips trailing blanks from its hint lines.
pub(crate) fn runs_from_marks(
    index: usize,
    marks: &[RunCategory],
    line_len: usize,
) -> Result<Runs> {
    if marks.len() > line_len {
        return Err(DiffError::HintTooLong {
            index,
            hint_len: marks.len(),
            line_len,
        });
    }

    let mut runs = Runs::new();
    let categories = marks
        .iter()
        .copied()
        .chain(std::iter::repeat(RunCategory::Unchanged))
        .take(line_len);

    for (offset, category) in categories.enumerate() {
        match runs.last_mut() {
            Some(run) if run.category == category => run.length += 1,
            _ => runs.push(Run::new(offset, 1, category)),
        }
    }

    Ok(runs)
}

/// Parse the payload of an ndiff `? ` line
pub fn parse_marks(marks: &str) -> Result<Vec<RunCategory>> {
    marks
        .chars()
        .enumerate()
        .map(|(offset, mark)| {
            RunCategory::from_mark(mark).ok_or(DiffError::UnknownHintMark { mark, offset })
        })
        .collect()
}
