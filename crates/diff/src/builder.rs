use log::{debug, trace};
use std::iter::Peekable;

use crate::descriptor::DiffDescriptor;
use crate::error::{DiffError, Result};
use crate::line::{Line, PlaceholderKind};
use crate::region::{is_change_row, Region, RowKind};
use crate::run::{runs_from_marks, whole_line, RunCategory, Runs};
use crate::tagged::{Side, TaggedEntry};

/// Turns a tagged line-diff stream into a [`DiffDescriptor`].
///
/// The builder pairs base and modified lines through a two-slot cache. A row
/// is emitted as soon as both slots hold a line; a slot that cannot be paired
/// receives a placeholder. The builder is consumed by [`build`](Self::build),
/// so its cache never outlives one stream.
#[derive(Debug)]
pub struct DescriptorBuilder {
    pending_base: Option<Line>,
    pending_modified: Option<Line>,
    base: Vec<Line>,
    modified: Vec<Line>,
    regions: Vec<Region>,
    next_base_number: usize,
    next_modified_number: usize,
}

impl Default for DescriptorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorBuilder {
    pub fn new() -> Self {
        Self {
            pending_base: None,
            pending_modified: None,
            base: Vec::new(),
            modified: Vec::new(),
            regions: Vec::new(),
            next_base_number: 1,
            next_modified_number: 1,
        }
    }

    /// Consume the whole stream and return the finished descriptor.
    ///
    /// Fails on the first malformed entry; nothing built so far is returned.
    pub fn build<I>(mut self, entries: I) -> Result<DiffDescriptor>
    where
        I: IntoIterator<Item = TaggedEntry>,
    {
        let mut entries = entries.into_iter().enumerate().peekable();

        while let Some((index, entry)) = entries.next() {
            match entry {
                TaggedEntry::BaseOnly(text) => {
                    // Consecutive base-only lines: the previous one was deleted
                    if self.pending_base.is_some() {
                        self.pair_with_placeholder();
                    }
                    let (runs, _) = unique_runs(&text, Side::Base, &mut entries)?;
                    self.pending_base = Some(Line::new(text, runs));
                }
                TaggedEntry::ModifiedOnly(text) => {
                    if self.pending_modified.is_some() {
                        self.pair_with_placeholder();
                    }
                    let (runs, hinted) = unique_runs(&text, Side::Modified, &mut entries)?;
                    self.pending_modified = Some(Line::new(text, runs));

                    // Without a hint and nothing to pair with, the line is new
                    if !hinted && self.pending_base.is_none() {
                        self.pending_base = Some(Line::placeholder(PlaceholderKind::Added));
                    }
                }
                TaggedEntry::Common(text) => {
                    self.pair_with_placeholder();

                    let runs = whole_line(text.chars().count(), RunCategory::Unchanged);
                    self.pending_base = Some(Line::new(text.clone(), runs.clone()));
                    self.pending_modified = Some(Line::new(text, runs));
                }
                TaggedEntry::Hint(_) => return Err(DiffError::StrayHint { index }),
            }

            self.flush();
        }

        self.pair_with_placeholder();

        debug!(
            "built descriptor: {} rows, {} regions",
            self.base.len(),
            self.regions.len()
        );

        Ok(DiffDescriptor {
            base: self.base,
            modified: self.modified,
            regions: self.regions,
        })
    }

    /// Give a lone pending line its placeholder partner and emit the row
    fn pair_with_placeholder(&mut self) {
        match (self.pending_base.is_some(), self.pending_modified.is_some()) {
            (false, false) => return,
            (true, false) => {
                self.pending_modified = Some(Line::placeholder(PlaceholderKind::Deleted));
            }
            (false, true) => {
                self.pending_base = Some(Line::placeholder(PlaceholderKind::Added));
            }
            (true, true) => {}
        }
        self.flush();
    }

    /// Emit a row if both slots are occupied
    fn flush(&mut self) {
        match (self.pending_base.take(), self.pending_modified.take()) {
            (Some(base), Some(modified)) => self.push_row(base, modified),
            (base, modified) => {
                self.pending_base = base;
                self.pending_modified = modified;
            }
        }
    }

    fn push_row(&mut self, mut base: Line, mut modified: Line) {
        let row = self.base.len();

        if !base.is_placeholder() {
            base.line_number = Some(self.next_base_number);
            self.next_base_number += 1;
        }
        if !modified.is_placeholder() {
            modified.line_number = Some(self.next_modified_number);
            self.next_modified_number += 1;
        }

        let kind = RowKind::classify(&base, &modified);
        if is_change_row(&base, &modified) {
            let region = match self.regions.last_mut() {
                Some(region) if region.rows.end == row => {
                    region.extend(kind);
                    region.index
                }
                _ => {
                    let index = self.regions.len();
                    debug!("opening region {index} at row {row} ({kind})");
                    self.regions.push(Region::open(index, row, kind));
                    index
                }
            };
            base.region = Some(region);
            modified.region = Some(region);
        }

        trace!(
            "flush row {row} ({kind}): base {:?} modified {:?}",
            base.text(),
            modified.text()
        );

        self.base.push(base);
        self.modified.push(modified);
    }
}

/// Runs for a line unique to one side.
///
/// Consumes the following entry when it is a hint describing this line and
/// reports whether it did.
fn unique_runs<I>(text: &str, side: Side, entries: &mut Peekable<I>) -> Result<(Runs, bool)>
where
    I: Iterator<Item = (usize, TaggedEntry)>,
{
    let len = text.chars().count();

    match entries.next_if(|(_, entry)| entry.is_hint()) {
        Some((index, TaggedEntry::Hint(marks))) => Ok((runs_from_marks(index, &marks, len)?, true)),
        _ => {
            let category = match side {
                Side::Base => RunCategory::Deleted,
                Side::Modified => RunCategory::Added,
            };
            Ok((whole_line(len, category), false))
        }
    }
}
