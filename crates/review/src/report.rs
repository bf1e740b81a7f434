use diff_desc::{total_stats, FileDescriptor};
use std::fmt;

/// Per-file statistics, one line per file and a total, names padded to a
/// common width
pub struct StatsTable<'a> {
    files: &'a [FileDescriptor],
}

pub fn stats_table(files: &[FileDescriptor]) -> StatsTable<'_> {
    StatsTable { files }
}

impl fmt::Display for StatsTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .files
            .iter()
            .map(|file| file.name.chars().count())
            .max()
            .unwrap_or(0)
            .max("total".len());

        for file in self.files {
            match &file.descriptor {
                Ok(desc) => writeln!(f, "{:<width$}  {}", file.name, desc.stats())?,
                Err(err) => writeln!(f, "{:<width$}  error: {err}", file.name)?,
            }
        }

        if self.files.len() > 1 {
            writeln!(f, "{:<width$}  {}", "total", total_stats(self.files))?;
        }
        Ok(())
    }
}
