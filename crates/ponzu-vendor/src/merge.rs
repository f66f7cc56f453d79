//! Directory tree merging with conflict detection.
//!
//! A merge clears the destination and mirrors the source into it. An
//! overlay skips the clear and copies on top of whatever is already there,
//! reporting every file it overwrites unless that file's name is excluded.
//! Conflicts are warnings: the copy always proceeds.

use std::collections::{BTreeSet, HashSet};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use ponzu_common::error::{PonzuError, Result};
use walkdir::WalkDir;

/// Source, destination, and the file names exempt from conflict reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSpec {
    source: PathBuf,
    destination: PathBuf,
    excluded: BTreeSet<String>,
}

impl MergeSpec {
    /// Creates a spec with no exclusions.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            excluded: BTreeSet::new(),
        }
    }

    /// Adds file names that never produce a conflict warning.
    #[must_use]
    pub fn excluding<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(names.into_iter().map(Into::into));
        self
    }

    /// Returns the source tree.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Returns the destination tree.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    fn is_excluded(&self, file_name: &OsStr) -> bool {
        file_name
            .to_str()
            .is_some_and(|name| self.excluded.contains(name))
    }
}

/// A destination file that existed before the copy began and was
/// overwritten by a source file with the same relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// Path relative to the destination root.
    pub relative: PathBuf,
    /// Absolute destination path that was overwritten.
    pub destination: PathBuf,
}

/// Outcome of a merge or overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Number of regular files copied.
    pub files_copied: usize,
    /// Overwritten files not covered by the exclusion list.
    pub conflicts: Vec<Conflict>,
}

impl MergeReport {
    /// Folds another report into this one.
    pub fn absorb(&mut self, other: Self) {
        self.files_copied += other.files_copied;
        self.conflicts.extend(other.conflicts);
    }
}

/// Clears the destination, then copies the source tree into it.
///
/// A missing source is not an error: the destination is left empty.
///
/// # Errors
///
/// Returns [`PonzuError::Io`] if the destination cannot be cleared or
/// recreated, or if any file cannot be read or written.
pub fn merge(spec: &MergeSpec) -> Result<MergeReport> {
    clear_dir(&spec.destination)?;
    overlay(spec)
}

/// Copies the source tree on top of the destination without clearing it.
///
/// Files present in the destination before the copy started are
/// overwritten; each one whose name is not excluded is reported as a
/// [`Conflict`] and logged. Permission bits of copied files are preserved.
///
/// # Errors
///
/// Returns [`PonzuError::Io`] if a directory cannot be created, the source
/// cannot be walked, or a file cannot be copied.
pub fn overlay(spec: &MergeSpec) -> Result<MergeReport> {
    let source = spec.source.as_path();
    let destination = spec.destination.as_path();

    std::fs::create_dir_all(destination).map_err(|e| PonzuError::io(destination, e))?;

    if !source.exists() {
        tracing::debug!(source = %source.display(), "source tree absent, nothing to copy");
        return Ok(MergeReport::default());
    }

    let existing = snapshot_files(destination)?;
    let mut report = MergeReport::default();

    for entry in WalkDir::new(source).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_error(source, e))?;
        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        if relative.as_os_str().is_empty() {
            continue;
        }
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| PonzuError::io(&target, e))?;
            continue;
        }

        if existing.contains(relative) {
            if !spec.is_excluded(entry.file_name()) {
                tracing::warn!(
                    file = %relative.display(),
                    destination = %destination.display(),
                    "file conflicts with an existing vendored file, overwriting"
                );
                report.conflicts.push(Conflict {
                    relative: relative.to_path_buf(),
                    destination: target.clone(),
                });
            }
            std::fs::remove_file(&target).map_err(|e| PonzuError::io(&target, e))?;
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PonzuError::io(parent, e))?;
        }
        let _ = std::fs::copy(entry.path(), &target).map_err(|e| PonzuError::io(&target, e))?;
        tracing::debug!(file = %relative.display(), "copied");
        report.files_copied += 1;
    }

    tracing::info!(
        source = %source.display(),
        destination = %destination.display(),
        files = report.files_copied,
        conflicts = report.conflicts.len(),
        "tree copied"
    );
    Ok(report)
}

/// Removes everything under `path` and recreates it as an empty directory.
///
/// # Errors
///
/// Returns [`PonzuError::Io`] if the directory cannot be removed or created.
pub fn clear_dir(path: &Path) -> Result<()> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => {
            std::fs::remove_dir_all(path).map_err(|e| PonzuError::io(path, e))?;
        }
        Ok(_) => std::fs::remove_file(path).map_err(|e| PonzuError::io(path, e))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(PonzuError::io(path, e)),
    }
    std::fs::create_dir_all(path).map_err(|e| PonzuError::io(path, e))?;
    tracing::debug!(path = %path.display(), "cleared directory");
    Ok(())
}

/// Relative paths of every non-directory entry under `root`.
fn snapshot_files(root: &Path) -> Result<HashSet<PathBuf>> {
    let mut files = HashSet::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if entry.file_type().is_dir() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            let _ = files.insert(relative.to_path_buf());
        }
    }
    Ok(files)
}

fn walk_error(root: &Path, err: walkdir::Error) -> PonzuError {
    let path = err.path().unwrap_or(root).to_path_buf();
    PonzuError::Io {
        path,
        source: err.into(),
    }
}
