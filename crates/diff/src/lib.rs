// Side-by-side diff descriptors for the review viewer.
// Turns a tagged line-diff stream into two aligned line sequences with
// character runs, change regions and statistics.

mod batch;
mod builder;
mod descriptor;
mod error;
mod line;
mod region;
mod run;
mod source;
mod stats;
mod tagged;

pub use batch::{build_all, describe_all, total_stats, FileDescriptor, FilePair};
pub use builder::DescriptorBuilder;
pub use descriptor::{DiffDescriptor, Row};
pub use error::{DiffError, Result};
pub use line::{Line, PlaceholderKind};
pub use region::{is_change_row, Region, RegionKind, RowKind};
pub use run::{parse_marks, Run, RunCategory, Runs};
pub use source::SourceOptions;
pub use stats::{validate, DiffStats, Violation};
pub use tagged::{format_ndiff, parse_ndiff, Side, TaggedEntry};

// Re-exported so callers can pick a line matching algorithm
pub use similar::Algorithm;
