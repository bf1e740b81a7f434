use derive_more::Display;
use log::warn;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::descriptor::DiffDescriptor;
use crate::line::Line;
use crate::region::RowKind;
use crate::tagged::Side;

/// Line counts derived from a finished descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiffStats {
    /// Number of visual rows
    pub rows: usize,

    /// Real lines on the base side
    pub base_lines: usize,

    /// Real lines on the modified side
    pub modified_lines: usize,

    pub added: usize,
    pub deleted: usize,
    pub changed: usize,
    pub unchanged: usize,

    pub regions: usize,
}

impl DiffStats {
    pub fn of(desc: &DiffDescriptor) -> Self {
        let mut stats = DiffStats {
            rows: desc.row_count(),
            regions: desc.regions().len(),
            ..Default::default()
        };

        for row in desc.rows() {
            if !row.base.is_placeholder() {
                stats.base_lines += 1;
            }
            if !row.modified.is_placeholder() {
                stats.modified_lines += 1;
            }
            match row.kind() {
                RowKind::Added => stats.added += 1,
                RowKind::Deleted => stats.deleted += 1,
                RowKind::Changed => stats.changed += 1,
                RowKind::Unchanged => stats.unchanged += 1,
            }
        }

        stats
    }

    pub fn has_changes(&self) -> bool {
        self.added + self.deleted + self.changed > 0
    }

    /// Add the counts of another file, for per-directory totals
    pub fn accumulate(&mut self, other: &DiffStats) {
        self.rows += other.rows;
        self.base_lines += other.base_lines;
        self.modified_lines += other.modified_lines;
        self.added += other.added;
        self.deleted += other.deleted;
        self.changed += other.changed;
        self.unchanged += other.unchanged;
        self.regions += other.regions;
    }
}

impl fmt::Display for DiffStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "+{} -{} ~{} ({} lines, {} regions)",
            self.added, self.deleted, self.changed, self.modified_lines, self.regions
        )
    }
}

/// A structural defect found in a descriptor.
///
/// These are never produced for well-formed input; seeing one means the
/// builder is wrong.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Violation {
    #[display(fmt = "base has {} rows but modified has {}", base, modified)]
    SideLengthMismatch { base: usize, modified: usize },

    #[display(fmt = "row {} ({:?}): run {} has zero length", row, side, run)]
    EmptyRun { side: Side, row: usize, run: usize },

    #[display(
        fmt = "row {} ({:?}): run {} starts at {}, expected {}",
        row,
        side,
        run,
        found,
        expected
    )]
    RunGap {
        side: Side,
        row: usize,
        run: usize,
        expected: usize,
        found: usize,
    },

    #[display(
        fmt = "row {} ({:?}): runs cover {} characters of {}",
        row,
        side,
        covered,
        len
    )]
    RunCoverage {
        side: Side,
        row: usize,
        covered: usize,
        len: usize,
    },

    #[display(fmt = "row {}: placeholder on both sides", row)]
    DoublePlaceholder { row: usize },

    #[display(fmt = "row {}: {:?} line refers to region {:?}, expected {:?}", row, side, found, expected)]
    RegionReference {
        side: Side,
        row: usize,
        expected: Option<usize>,
        found: Option<usize>,
    },

    #[display(fmt = "row {}: unchanged row inside region {}", row, region)]
    UnchangedInRegion { row: usize, region: usize },

    #[display(fmt = "row {}: changed row outside any region", row)]
    ChangeOutsideRegion { row: usize },

    #[display(fmt = "region at position {} is numbered {}", position, index)]
    RegionIndex { position: usize, index: usize },

    #[display(fmt = "region {} is empty or out of bounds", region)]
    RegionBounds { region: usize },

    #[display(fmt = "region {} overlaps or precedes region {}", region, previous)]
    RegionOrder { previous: usize, region: usize },

    #[display(fmt = "regions {} and {} are adjacent and should be one", previous, region)]
    RegionsNotMerged { previous: usize, region: usize },
}

/// Check every structural invariant of a descriptor and report what is broken
pub fn validate(desc: &DiffDescriptor) -> Vec<Violation> {
    let mut violations = Vec::new();

    if desc.base.len() != desc.modified.len() {
        violations.push(Violation::SideLengthMismatch {
            base: desc.base.len(),
            modified: desc.modified.len(),
        });
    }

    check_regions(desc, &mut violations);

    // Which region each row should point at, according to the region list
    let mut expected_region = vec![None; desc.row_count()];
    for region in desc.regions() {
        for row in region.rows() {
            if let Some(slot) = expected_region.get_mut(row) {
                slot.get_or_insert(region.index());
            }
        }
    }

    for row in desc.rows() {
        check_runs(Side::Base, row.index, row.base, &mut violations);
        check_runs(Side::Modified, row.index, row.modified, &mut violations);

        if row.base.is_placeholder() && row.modified.is_placeholder() {
            violations.push(Violation::DoublePlaceholder { row: row.index });
        }

        let expected = expected_region[row.index];
        for (side, line) in [(Side::Base, row.base), (Side::Modified, row.modified)] {
            if line.region() != expected {
                violations.push(Violation::RegionReference {
                    side,
                    row: row.index,
                    expected,
                    found: line.region(),
                });
            }
        }

        match (row.is_change(), expected) {
            (false, Some(region)) => violations.push(Violation::UnchangedInRegion {
                row: row.index,
                region,
            }),
            (true, None) => violations.push(Violation::ChangeOutsideRegion { row: row.index }),
            _ => {}
        }
    }

    for violation in &violations {
        warn!("descriptor invariant violated: {violation}");
    }

    violations
}

fn check_regions(desc: &DiffDescriptor, violations: &mut Vec<Violation>) {
    let rows = desc.row_count();

    for (position, region) in desc.regions().iter().enumerate() {
        if region.index() != position {
            violations.push(Violation::RegionIndex {
                position,
                index: region.index(),
            });
        }
        if region.is_empty() || region.rows().end > rows {
            violations.push(Violation::RegionBounds {
                region: region.index(),
            });
        }
    }

    for pair in desc.regions().windows(2) {
        let (previous, region) = (&pair[0], &pair[1]);
        if region.rows().start < previous.rows().end {
            violations.push(Violation::RegionOrder {
                previous: previous.index(),
                region: region.index(),
            });
        } else if region.rows().start == previous.rows().end {
            violations.push(Violation::RegionsNotMerged {
                previous: previous.index(),
                region: region.index(),
            });
        }
    }
}

fn check_runs(side: Side, row: usize, line: &Line, violations: &mut Vec<Violation>) {
    let mut expected = 0;
    let mut covered = 0;

    for (idx, run) in line.runs().iter().enumerate() {
        if run.length == 0 {
            violations.push(Violation::EmptyRun { side, row, run: idx });
        }
        if run.start != expected {
            violations.push(Violation::RunGap {
                side,
                row,
                run: idx,
                expected,
                found: run.start,
            });
        }
        expected = run.end();
        covered += run.length;
    }

    let len = line.char_len();
    if covered != len {
        violations.push(Violation::RunCoverage {
            side,
            row,
            covered,
            len,
        });
    }
}

impl DiffDescriptor {
    pub fn stats(&self) -> DiffStats {
        DiffStats::of(self)
    }

    /// Every invariant violation in this descriptor; empty when it is sound
    pub fn violations(&self) -> Vec<Violation> {
        validate(self)
    }
}
