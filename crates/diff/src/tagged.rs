use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DiffError, Result};
use crate::run::{parse_marks, RunCategory};

/// Which file a line-diff entry speaks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Base,
    Modified,
}

/// One entry produced by a line diff source.
///
/// A stream of these is the sole input of the descriptor builder.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TaggedEntry {
    /// A line present only in the base file
    BaseOnly(String),

    /// A line present only in the modified file
    ModifiedOnly(String),

    /// A line present, unchanged, in both files
    Common(String),

    /// Per-character categories for the preceding base-only or modified-only line
    Hint(Vec<RunCategory>),
}

impl TaggedEntry {
    /// Build a hint entry from ndiff marks (` `, `-`, `+`, `^`)
    pub fn hint(marks: &str) -> Result<Self> {
        Ok(TaggedEntry::Hint(parse_marks(marks)?))
    }

    /// Parse one line of ndiff output. `line_number` is only used for errors.
    pub fn parse_ndiff_line(line_number: usize, line: &str) -> Result<Self> {
        let mut chars = line.chars();
        let tag = chars.next();
        let separator = chars.next();
        // Editors strip the trailing blank of "- " on empty lines
        if !matches!(separator, Some(' ') | None) {
            return Err(unknown_tag(line_number, line));
        }
        let payload = chars.as_str();

        match tag {
            Some('-') => Ok(TaggedEntry::BaseOnly(payload.to_string())),
            Some('+') => Ok(TaggedEntry::ModifiedOnly(payload.to_string())),
            Some(' ') => Ok(TaggedEntry::Common(payload.to_string())),
            Some('?') => TaggedEntry::hint(payload),
            _ => Err(unknown_tag(line_number, line)),
        }
    }

    pub fn is_hint(&self) -> bool {
        matches!(self, TaggedEntry::Hint(_))
    }
}

fn unknown_tag(line_number: usize, line: &str) -> DiffError {
    DiffError::UnknownTag {
        line_number,
        line: line.to_string(),
    }
}

impl fmt::Display for TaggedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaggedEntry::BaseOnly(text) => write!(f, "- {text}"),
            TaggedEntry::ModifiedOnly(text) => write!(f, "+ {text}"),
            TaggedEntry::Common(text) => write!(f, "  {text}"),
            TaggedEntry::Hint(marks) => {
                f.write_str("? ")?;
                marks
                    .iter()
                    .try_for_each(|category| write!(f, "{}", category.mark()))
            }
        }
    }
}

/// Parse a complete ndiff stream, one entry per line
pub fn parse_ndiff(text: &str) -> Result<Vec<TaggedEntry>> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| TaggedEntry::parse_ndiff_line(idx + 1, line))
        .collect()
}

/// Render a stream in ndiff form, newline-terminated
pub fn format_ndiff(entries: &[TaggedEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&entry.to_string());
        out.push('\n');
    }
    out
}
