use log::debug;
use rayon::prelude::*;

use crate::descriptor::DiffDescriptor;
use crate::error::Result;
use crate::source::SourceOptions;
use crate::stats::DiffStats;
use crate::tagged::TaggedEntry;

/// The base and modified contents of one file under review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePair {
    /// Display name, usually the path relative to the staged trees
    pub name: String,
    pub base: String,
    pub modified: String,
}

impl FilePair {
    pub fn new(name: impl Into<String>, base: impl Into<String>, modified: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: base.into(),
            modified: modified.into(),
        }
    }
}

/// The outcome of describing one file
#[derive(Debug)]
pub struct FileDescriptor {
    pub name: String,
    pub descriptor: Result<DiffDescriptor>,
}

impl FileDescriptor {
    pub fn stats(&self) -> Option<DiffStats> {
        self.descriptor.as_ref().ok().map(DiffDescriptor::stats)
    }
}

/// Describe every pair in parallel. Results keep the order of `pairs`.
pub fn describe_all(options: &SourceOptions, pairs: &[FilePair]) -> Vec<FileDescriptor> {
    debug!("describing {} file pairs", pairs.len());

    pairs
        .par_iter()
        .map(|pair| FileDescriptor {
            name: pair.name.clone(),
            descriptor: options.describe(&pair.base, &pair.modified),
        })
        .collect()
}

/// Build descriptors for already computed streams in parallel
pub fn build_all(streams: Vec<Vec<TaggedEntry>>) -> Vec<Result<DiffDescriptor>> {
    streams.into_par_iter().map(DiffDescriptor::build).collect()
}

/// Sum the statistics of every successfully described file
pub fn total_stats(files: &[FileDescriptor]) -> DiffStats {
    files
        .iter()
        .filter_map(FileDescriptor::stats)
        .fold(DiffStats::default(), |mut total, stats| {
            total.accumulate(&stats);
            total
        })
}
