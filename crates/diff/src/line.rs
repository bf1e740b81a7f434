use derive_more::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::run::{Run, RunCategory, Runs};

/// Why a placeholder row exists on its side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PlaceholderKind {
    /// Sits on the base side, opposite a line added to the modified file
    #[display(fmt = "NotPresentAdded")]
    Added,

    /// Sits on the modified side, opposite a line deleted from the base file
    #[display(fmt = "NotPresentDeleted")]
    Deleted,
}

/// One rendered row of text on one side of the diff
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Line {
    pub(crate) text: String,
    pub(crate) line_number: Option<usize>,
    pub(crate) runs: Runs,
    pub(crate) region: Option<usize>,
    pub(crate) placeholder: Option<PlaceholderKind>,
}

impl Line {
    pub(crate) fn new(text: String, runs: Runs) -> Self {
        Self {
            text,
            line_number: None,
            runs,
            region: None,
            placeholder: None,
        }
    }

    /// A synthetic "not present" line keeping both sides aligned
    pub(crate) fn placeholder(kind: PlaceholderKind) -> Self {
        Self {
            text: String::new(),
            line_number: None,
            runs: Runs::new(),
            region: None,
            placeholder: Some(kind),
        }
    }

    /// The literal line content, without its line terminator
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The 1-based line number in the source file, `None` for placeholders
    pub fn line_number(&self) -> Option<usize> {
        self.line_number
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Index of the region this line belongs to
    pub fn region(&self) -> Option<usize> {
        self.region
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder.is_some()
    }

    pub fn placeholder_kind(&self) -> Option<PlaceholderKind> {
        self.placeholder
    }

    /// Whether any run marks characters as added, deleted or changed
    pub fn has_edits(&self) -> bool {
        self.runs
            .iter()
            .any(|run| run.category != RunCategory::Unchanged)
    }

    /// Length of the text in characters, the unit runs are measured in
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// The text covered by `run`, sliced on character boundaries
    pub fn run_text(&self, run: &Run) -> &str {
        let mut indices = self
            .text
            .char_indices()
            .map(|(idx, _)| idx)
            .chain(std::iter::once(self.text.len()));
        let start = indices.nth(run.start).unwrap_or(self.text.len());
        let end = if run.length == 0 {
            start
        } else {
            indices.nth(run.length - 1).unwrap_or(self.text.len())
        };
        &self.text[start..end]
    }
}
