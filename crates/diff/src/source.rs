use log::trace;
use ropey::Rope;
use similar::{Algorithm, DiffTag, TextDiff};
use std::borrow::Cow;
use std::ops::Range;
use std::time::Duration;

use crate::descriptor::DiffDescriptor;
use crate::error::Result;
use crate::run::RunCategory;
use crate::tagged::{format_ndiff, TaggedEntry};

/// Configuration of the line diff source.
///
/// Drives `similar` over two texts and produces the tagged stream the
/// descriptor builder consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOptions {
    algorithm: Algorithm,
    intraline_cutoff: f32,
    timeout: Option<Duration>,
    normalize_line_endings: bool,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Myers,
            intraline_cutoff: 0.75,
            timeout: Some(Duration::from_secs(5)),
            normalize_line_endings: true,
        }
    }
}

impl SourceOptions {
    /// Set the line matching algorithm
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Similarity ratio (0.0 to 1.0) a replaced line pair needs before it
    /// gets character-level hints
    pub fn intraline_cutoff(mut self, cutoff: f32) -> Self {
        self.intraline_cutoff = cutoff.clamp(0.0, 1.0);
        self
    }

    /// Deadline for the line diff; past it `similar` falls back to a coarser result
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether `\r\n` and lone `\r` are folded into `\n` before splitting
    pub fn normalize_line_endings(mut self, normalize: bool) -> Self {
        self.normalize_line_endings = normalize;
        self
    }

    pub fn get_intraline_cutoff(&self) -> f32 {
        self.intraline_cutoff
    }

    /// Split a text into lines without their terminators
    pub fn split_lines(&self, text: &str) -> Vec<String> {
        let text: Cow<'_, str> = if self.normalize_line_endings && text.contains('\r') {
            Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
        } else {
            Cow::Borrowed(text)
        };

        let rope = Rope::from_str(&text);
        let mut lines: Vec<String> = rope
            .lines()
            .map(|line| {
                let mut line = line.to_string();
                strip_line_break(&mut line);
                line
            })
            .collect();

        // The rope reports an empty line after a trailing terminator
        if matches!(lines.last(), Some(line) if line.is_empty()) {
            lines.pop();
        }
        lines
    }

    /// Compare two texts line by line and produce the tagged stream
    pub fn tagged_stream(&self, base: &str, modified: &str) -> Vec<TaggedEntry> {
        let base_lines = self.split_lines(base);
        let modified_lines = self.split_lines(modified);
        self.tagged_stream_from_lines(&base_lines, &modified_lines)
    }

    /// Produce the tagged stream for two already split files
    pub fn tagged_stream_from_lines<S: AsRef<str>>(
        &self,
        base: &[S],
        modified: &[S],
    ) -> Vec<TaggedEntry> {
        let old: Vec<&str> = base.iter().map(AsRef::as_ref).collect();
        let new: Vec<&str> = modified.iter().map(AsRef::as_ref).collect();

        let mut config = TextDiff::configure();
        config.algorithm(self.algorithm);
        if let Some(timeout) = self.timeout {
            config.timeout(timeout);
        }
        let diff = config.diff_slices(old.as_slice(), new.as_slice());

        let mut entries = Vec::with_capacity(old.len().max(new.len()));
        for op in diff.ops() {
            let (tag, old_range, new_range) = op.as_tag_tuple();
            match tag {
                DiffTag::Equal => entries.extend(
                    old[old_range]
                        .iter()
                        .map(|line| TaggedEntry::Common(line.to_string())),
                ),
                DiffTag::Delete => entries.extend(
                    old[old_range]
                        .iter()
                        .map(|line| TaggedEntry::BaseOnly(line.to_string())),
                ),
                DiffTag::Insert => entries.extend(
                    new[new_range]
                        .iter()
                        .map(|line| TaggedEntry::ModifiedOnly(line.to_string())),
                ),
                DiffTag::Replace => {
                    self.push_replaced(&old, old_range, &new, new_range, &mut entries)
                }
            }
        }

        trace!(
            "line diff: {} base lines, {} modified lines, {} entries",
            old.len(),
            new.len(),
            entries.len()
        );
        entries
    }

    /// Build a descriptor for two texts
    pub fn describe(&self, base: &str, modified: &str) -> Result<DiffDescriptor> {
        DiffDescriptor::build(self.tagged_stream(base, modified))
    }

    /// Render the tagged stream of two texts in ndiff form
    pub fn ndiff(&self, base: &str, modified: &str) -> String {
        format_ndiff(&self.tagged_stream(base, modified))
    }

    /// Pair replaced lines in order; similar pairs get hints, the rest stand alone
    fn push_replaced(
        &self,
        old: &[&str],
        old_range: Range<usize>,
        new: &[&str],
        new_range: Range<usize>,
        entries: &mut Vec<TaggedEntry>,
    ) {
        let paired = old_range.len().min(new_range.len());

        for k in 0..paired {
            let base = old[old_range.start + k];
            let modified = new[new_range.start + k];

            entries.push(TaggedEntry::BaseOnly(base.to_string()));
            match self.intraline_hints(base, modified) {
                Some((base_marks, modified_marks)) => {
                    entries.push(TaggedEntry::Hint(base_marks));
                    entries.push(TaggedEntry::ModifiedOnly(modified.to_string()));
                    entries.push(TaggedEntry::Hint(modified_marks));
                }
                None => entries.push(TaggedEntry::ModifiedOnly(modified.to_string())),
            }
        }

        entries.extend(
            old[old_range.start + paired..old_range.end]
                .iter()
                .map(|line| TaggedEntry::BaseOnly(line.to_string())),
        );
        entries.extend(
            new[new_range.start + paired..new_range.end]
                .iter()
                .map(|line| TaggedEntry::ModifiedOnly(line.to_string())),
        );
    }

    /// Character categories for both lines of a replaced pair, or `None`
    /// when the lines are too dissimilar to be worth marking up
    pub fn intraline_hints(
        &self,
        base: &str,
        modified: &str,
    ) -> Option<(Vec<RunCategory>, Vec<RunCategory>)> {
        let diff = TextDiff::configure()
            .algorithm(self.algorithm)
            .diff_chars(base, modified);
        if diff.ratio() < self.intraline_cutoff {
            return None;
        }

        let mut base_marks = Vec::new();
        let mut modified_marks = Vec::new();
        for op in diff.ops() {
            let (tag, old_range, new_range) = op.as_tag_tuple();
            let (base_mark, modified_mark) = match tag {
                DiffTag::Equal => (RunCategory::Unchanged, RunCategory::Unchanged),
                // One of the two ranges is empty
                DiffTag::Delete | DiffTag::Insert => (RunCategory::Deleted, RunCategory::Added),
                DiffTag::Replace => (RunCategory::Changed, RunCategory::Changed),
            };
            base_marks.extend(std::iter::repeat(base_mark).take(old_range.len()));
            modified_marks.extend(std::iter::repeat(modified_mark).take(new_range.len()));
        }

        Some((base_marks, modified_marks))
    }
}

/// Remove the single line terminator the rope leaves on each line
fn strip_line_break(line: &mut String) {
    if line.ends_with("\r\n") {
        line.truncate(line.len() - 2);
        return;
    }
    if let Some(ch) = line.chars().last() {
        if matches!(
            ch,
            '\n' | '\u{000B}' | '\u{000C}' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}'
        ) {
            line.truncate(line.len() - ch.len_utf8());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn split_drops_terminators() {
        let options = SourceOptions::default();

        assert_eq!(options.split_lines(""), Vec::<String>::new());
        assert_eq!(options.split_lines("a"), vec!["a"]);
        assert_eq!(options.split_lines("a\n"), vec!["a"]);
        assert_eq!(options.split_lines("a\n\n"), vec!["a", ""]);
        assert_eq!(options.split_lines("a\r\nb\rc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn split_keeps_crlf_lines_apart_without_normalizing() {
        let options = SourceOptions::default().normalize_line_endings(false);
        assert_eq!(options.split_lines("a\r\nb\r\n"), vec!["a", "b"]);
    }

    #[test]
    fn similar_pairs_get_hints() {
        let options = SourceOptions::default();
        let (base, modified) = options.intraline_hints("let x = 1;", "let y = 1;").unwrap();

        assert_eq!(base.len(), 10);
        assert_eq!(modified.len(), 10);
        assert_eq!(base[4], RunCategory::Changed);
        assert_eq!(modified[4], RunCategory::Changed);
        assert!(base
            .iter()
            .enumerate()
            .all(|(idx, mark)| idx == 4 || *mark == RunCategory::Unchanged));
    }

    #[test]
    fn dissimilar_pairs_get_no_hints() {
        let options = SourceOptions::default();
        assert!(options.intraline_hints("abcdef", "uvwxyz").is_none());
    }

    #[test]
    fn cutoff_is_clamped() {
        let options = SourceOptions::default().intraline_cutoff(3.0);
        assert_eq!(options.get_intraline_cutoff(), 1.0);
    }
}
