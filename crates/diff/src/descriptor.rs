use std::fmt;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::builder::DescriptorBuilder;
use crate::error::Result;
use crate::line::Line;
use crate::region::{is_change_row, Region, RowKind};
use crate::tagged::TaggedEntry;

/// A side-by-side rendering model of two files.
///
/// `base` and `modified` always hold the same number of lines, and index `i`
/// on both sides is the same visual row. Changed rows are grouped into
/// regions; unchanged rows never belong to one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiffDescriptor {
    pub(crate) base: Vec<Line>,
    pub(crate) modified: Vec<Line>,
    pub(crate) regions: Vec<Region>,
}

/// One visual row, borrowed from a descriptor
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    pub index: usize,
    pub base: &'a Line,
    pub modified: &'a Line,
}

impl Row<'_> {
    pub fn kind(&self) -> RowKind {
        RowKind::classify(self.base, self.modified)
    }

    pub fn region(&self) -> Option<usize> {
        self.base.region().or(self.modified.region())
    }

    /// Whether the row is highlighted, and therefore part of a region
    pub fn is_change(&self) -> bool {
        is_change_row(self.base, self.modified)
    }
}

impl DiffDescriptor {
    /// Build a descriptor from a tagged line-diff stream
    pub fn build<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = TaggedEntry>,
    {
        DescriptorBuilder::new().build(entries)
    }

    pub fn base(&self) -> &[Line] {
        &self.base
    }

    pub fn modified(&self) -> &[Line] {
        &self.modified
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Number of visual rows (equal to the length of either side)
    pub fn row_count(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        Some(Row {
            index,
            base: self.base.get(index)?,
            modified: self.modified.get(index)?,
        })
    }

    /// Walk both sides in lockstep
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.base
            .iter()
            .zip(self.modified.iter())
            .enumerate()
            .map(|(index, (base, modified))| Row {
                index,
                base,
                modified,
            })
    }

    pub fn row_kind(&self, index: usize) -> Option<RowKind> {
        self.row(index).map(|row| row.kind())
    }

    /// Check if the two files differ at all
    pub fn has_changes(&self) -> bool {
        !self.regions.is_empty()
    }

    pub fn region(&self, index: usize) -> Option<&Region> {
        self.regions.get(index)
    }

    /// Rows spanned by the region with the given index
    pub fn region_rows(&self, index: usize) -> Option<Range<usize>> {
        self.regions.get(index).map(Region::rows)
    }

    /// The region covering `row`, if the row is part of a change
    pub fn region_at(&self, row: usize) -> Option<&Region> {
        let index = self.base.get(row)?.region()?;
        self.regions.get(index)
    }

    /// The first region that starts below `row`
    pub fn next_region(&self, row: usize) -> Option<&Region> {
        let position = self.regions.partition_point(|region| region.rows.start <= row);
        self.regions.get(position)
    }

    /// The last region that ends above `row`
    pub fn previous_region(&self, row: usize) -> Option<&Region> {
        let position = self.regions.partition_point(|region| region.rows.end <= row);
        position.checked_sub(1).and_then(|idx| self.regions.get(idx))
    }
}

impl fmt::Display for DiffDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Regions:")?;
        for region in &self.regions {
            writeln!(
                f,
                "  {:>3}. {} rows {}..{}",
                region.index, region.kind, region.rows.start, region.rows.end
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Rows:")?;
        for row in self.rows() {
            match row.region() {
                Some(region) => writeln!(f, "{:>5}  rgn: {}", row.index, region)?,
                None => writeln!(f, "{:>5}  rgn: none", row.index)?,
            }
            write_side(f, "base", row.base)?;
            write_side(f, "modi", row.modified)?;
        }
        Ok(())
    }
}

fn write_side(f: &mut fmt::Formatter<'_>, label: &str, line: &Line) -> fmt::Result {
    let number = line
        .line_number()
        .map_or_else(|| "-".to_string(), |n| n.to_string());

    if let Some(kind) = line.placeholder_kind() {
        return writeln!(f, "  {label} {number:>5}  {kind}");
    }

    write!(f, "  {label} {number:>5}  <{}>  [", line.text())?;
    let mut expected_start = 0;
    let mut covered = 0;
    for run in line.runs() {
        write!(f, " {run}")?;
        if run.length == 0 {
            write!(f, " <err: len>")?;
        }
        if run.start != expected_start {
            write!(f, " <err: start>")?;
        }
        expected_start = run.end();
        covered += run.length;
    }
    write!(f, " ]")?;
    if covered != line.char_len() {
        write!(f, " <err: total len>")?;
    }
    writeln!(f)
}
