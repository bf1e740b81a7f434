//! Loading file pairs from disk
//!
//! The SCM side stages a base tree and a modified tree; files are paired by
//! their path relative to each root. A file missing on one side was added or
//! deleted and is compared against an empty text.

use anyhow::{bail, Context, Result};
use diff_desc::FilePair;
use log::{debug, warn};
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Read a whole file as UTF-8 text
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Pair two files, or every file of two directory trees
pub fn collect_pairs(base: &Path, modified: &Path) -> Result<Vec<FilePair>> {
    match (base.is_dir(), modified.is_dir()) {
        (true, true) => collect_tree_pairs(base, modified),
        (false, false) => Ok(vec![FilePair::new(
            modified.display().to_string(),
            read_text(base)?,
            read_text(modified)?,
        )]),
        _ => bail!(
            "{} and {} must both be files or both be directories",
            base.display(),
            modified.display()
        ),
    }
}

fn collect_tree_pairs(base: &Path, modified: &Path) -> Result<Vec<FilePair>> {
    let mut relative = relative_files(base)?;
    relative.extend(relative_files(modified)?);
    debug!(
        "pairing {} files between {} and {}",
        relative.len(),
        base.display(),
        modified.display()
    );

    let mut pairs = Vec::with_capacity(relative.len());
    for path in relative {
        let base_text = read_optional(&base.join(&path))?;
        let modified_text = read_optional(&modified.join(&path))?;

        match (base_text, modified_text) {
            (Some(base_text), Some(modified_text)) => pairs.push(FilePair::new(
                path.display().to_string(),
                base_text,
                modified_text,
            )),
            _ => warn!("skipping {}: not a UTF-8 text file", path.display()),
        }
    }
    Ok(pairs)
}

/// Every regular file below `root`, relative to it
fn relative_files(root: &Path) -> Result<BTreeSet<PathBuf>> {
    let mut files = BTreeSet::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if entry.file_type().is_file() {
            let path = entry.path().strip_prefix(root)?;
            files.insert(path.to_path_buf());
        }
    }
    Ok(files)
}

/// Text of a file that may not exist on this side.
///
/// A missing file reads as empty; `None` means the file is not text.
fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8(bytes).ok()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Some(String::new())),
        Err(err) => Err(err).with_context(|| format!("Failed to read {}", path.display())),
    }
}
