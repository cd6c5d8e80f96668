//! Recursive directory copy and move
//!
//! Both operations walk the source depth-first, one entry at a time, and
//! never abort on a single failing entry. Failures are logged, collected in
//! the returned [`SyncReport`] and the walk continues with the next entry.
//! Only problems with the two root directories are returned as `Err`.
//! Symlinks below the root are copied or moved as links and never walked.

pub mod copy;
pub mod relocate;

pub use copy::{copy_file_atomic, copy_symlink, write_file_atomic};
pub use relocate::move_file;

use crate::types::{DeployError, FsOperation};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A single entry that could not be processed
#[derive(Debug)]
pub struct SyncFailure {
    pub operation: FsOperation,
    pub path: PathBuf,
    pub source: io::Error,
}

impl SyncFailure {
    /// Convert into the crate error type
    pub fn into_error(self) -> DeployError {
        DeployError::fs(self.operation, self.path, self.source)
    }
}

/// Outcome of a best-effort tree copy or move
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Files copied or moved
    pub files: usize,
    /// Subdirectories visited below the source root
    pub directories: usize,
    /// Bytes copied or moved
    pub bytes: u64,
    /// Entries that were skipped, in traversal order
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    /// True when every entry was processed
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// One line per failure, capped at `limit` lines
    pub fn failure_summary(&self, limit: usize) -> String {
        let mut lines: Vec<String> = self
            .failures
            .iter()
            .take(limit)
            .map(|f| format!("  {} {}: {}", f.operation, f.path.display(), f.source))
            .collect();
        if self.failures.len() > limit {
            lines.push(format!("  ... and {} more", self.failures.len() - limit));
        }
        lines.join("\n")
    }
}

/// Events emitted while walking a tree
#[derive(Debug)]
pub enum SyncEvent<'a> {
    /// A file is about to be copied or moved
    EntryStart {
        operation: FsOperation,
        path: &'a Path,
    },
    /// A file was copied or moved
    EntryDone {
        operation: FsOperation,
        path: &'a Path,
        bytes: u64,
    },
    /// An entry was skipped
    EntryFailed { failure: &'a SyncFailure },
    /// The walk finished (with or without failures)
    Complete { report: &'a SyncReport },
}

/// Optional callback used to receive walk events.
pub type SyncCallback = dyn Fn(&SyncEvent<'_>) + Send + Sync;

/// Recursively copy `source` into `target`
///
/// `target` and any missing parents are created. Existing files in `target`
/// are overwritten; unrelated files in `target` are left alone. The source
/// tree is never modified.
///
/// # Errors
/// * [`DeployError::NotFound`] if `source` does not exist (nothing is created)
/// * [`DeployError::Config`] if `target` lies inside `source`
/// * [`DeployError::FilesystemOperation`] if `target` cannot be created or
///   `source` cannot be listed
pub fn copy_directory(
    source: &Path,
    target: &Path,
    on_event: Option<&SyncCallback>,
) -> Result<SyncReport, DeployError> {
    if !source.exists() {
        return Err(DeployError::NotFound {
            path: source.to_path_buf(),
        });
    }
    ensure_disjoint(source, target)?;

    tracing::info!("Copying {} -> {}", source.display(), target.display());

    fs::create_dir_all(target).map_err(|e| DeployError::fs(FsOperation::CreateDir, target, e))?;
    let entries =
        list_entries(source).map_err(|e| DeployError::fs(FsOperation::ReadDir, source, e))?;

    let mut walk = Walk::new(on_event);
    walk.copy_entries(source, target, entries);
    Ok(walk.finish())
}

/// Recursively move the contents of `source` into `target`
///
/// Files are renamed into place, replacing existing files. Each
/// subdirectory is removed once its contents have been moved. A file that
/// cannot be moved stays in the source tree, and so does every directory
/// above it. `source` itself is kept.
///
/// # Errors
/// * [`DeployError::Config`] if `target` lies inside `source`
/// * [`DeployError::FilesystemOperation`] if `target` cannot be created or
///   `source` cannot be listed (including when it does not exist)
pub fn move_files(
    source: &Path,
    target: &Path,
    on_event: Option<&SyncCallback>,
) -> Result<SyncReport, DeployError> {
    ensure_disjoint(source, target)?;

    tracing::info!("Moving {} -> {}", source.display(), target.display());

    fs::create_dir_all(target).map_err(|e| DeployError::fs(FsOperation::CreateDir, target, e))?;
    let entries =
        list_entries(source).map_err(|e| DeployError::fs(FsOperation::ReadDir, source, e))?;

    let mut walk = Walk::new(on_event);
    walk.move_entries(source, target, entries);
    Ok(walk.finish())
}

struct Walk<'cb> {
    report: SyncReport,
    on_event: Option<&'cb SyncCallback>,
}

impl<'cb> Walk<'cb> {
    fn new(on_event: Option<&'cb SyncCallback>) -> Self {
        Self {
            report: SyncReport::default(),
            on_event,
        }
    }

    fn copy_tree(&mut self, source: &Path, target: &Path) {
        if let Err(e) = fs::create_dir_all(target) {
            self.fail(FsOperation::CreateDir, target, e);
            return;
        }
        match list_entries(source) {
            Ok(entries) => self.copy_entries(source, target, entries),
            Err(e) => self.fail(FsOperation::ReadDir, source, e),
        }
    }

    fn copy_entries(&mut self, source: &Path, target: &Path, entries: Vec<OsString>) {
        for name in entries {
            let src_path = source.join(&name);
            let dest_path = target.join(&name);

            let file_type = match fs::symlink_metadata(&src_path) {
                Ok(m) => m.file_type(),
                Err(e) => {
                    self.fail(FsOperation::Stat, &src_path, e);
                    continue;
                }
            };

            if file_type.is_dir() {
                self.report.directories += 1;
                self.copy_tree(&src_path, &dest_path);
                continue;
            }

            self.emit(SyncEvent::EntryStart {
                operation: FsOperation::Copy,
                path: &src_path,
            });
            let result = if file_type.is_symlink() {
                copy_symlink(&src_path, &dest_path)
            } else {
                copy_file_atomic(&src_path, &dest_path)
            };
            match result {
                Ok(bytes) => self.done(FsOperation::Copy, &src_path, bytes),
                Err(e) => self.fail(FsOperation::Copy, &src_path, e),
            }
        }
    }

    fn move_tree(&mut self, source: &Path, target: &Path) {
        if let Err(e) = fs::create_dir_all(target) {
            self.fail(FsOperation::CreateDir, target, e);
            return;
        }
        match list_entries(source) {
            Ok(entries) => self.move_entries(source, target, entries),
            Err(e) => self.fail(FsOperation::ReadDir, source, e),
        }
    }

    fn move_entries(&mut self, source: &Path, target: &Path, entries: Vec<OsString>) {
        for name in entries {
            let src_path = source.join(&name);
            let dest_path = target.join(&name);

            // Symlinks are never followed; a link to a directory moves as a link.
            let file_type = match fs::symlink_metadata(&src_path) {
                Ok(m) => m.file_type(),
                Err(e) => {
                    self.fail(FsOperation::Stat, &src_path, e);
                    continue;
                }
            };

            if file_type.is_dir() {
                self.report.directories += 1;
                self.move_tree(&src_path, &dest_path);
                // Fails when something below was skipped; the directory stays.
                if let Err(e) = fs::remove_dir(&src_path) {
                    self.fail(FsOperation::RemoveDir, &src_path, e);
                }
                continue;
            }

            self.emit(SyncEvent::EntryStart {
                operation: FsOperation::Move,
                path: &src_path,
            });
            match move_file(&src_path, &dest_path) {
                Ok(bytes) => self.done(FsOperation::Move, &src_path, bytes),
                Err(e) => self.fail(FsOperation::Move, &src_path, e),
            }
        }
    }

    fn done(&mut self, operation: FsOperation, path: &Path, bytes: u64) {
        tracing::debug!("{} {} ({} bytes)", operation, path.display(), bytes);
        self.report.files += 1;
        self.report.bytes += bytes;
        self.emit(SyncEvent::EntryDone {
            operation,
            path,
            bytes,
        });
    }

    fn fail(&mut self, operation: FsOperation, path: &Path, source: io::Error) {
        tracing::warn!("Failed to {} {}: {}", operation, path.display(), source);
        self.report.failures.push(SyncFailure {
            operation,
            path: path.to_path_buf(),
            source,
        });
        if let (Some(callback), Some(failure)) = (self.on_event, self.report.failures.last()) {
            callback(&SyncEvent::EntryFailed { failure });
        }
    }

    fn emit(&self, event: SyncEvent<'_>) {
        if let Some(callback) = self.on_event {
            callback(&event);
        }
    }

    fn finish(self) -> SyncReport {
        let report = self.report;
        tracing::info!(
            files = report.files,
            directories = report.directories,
            failures = report.failures.len(),
            "Tree operation finished"
        );
        if let Some(callback) = self.on_event {
            callback(&SyncEvent::Complete { report: &report });
        }
        report
    }
}

/// Entry names of `dir`, sorted for a deterministic walk order
fn list_entries(dir: &Path) -> io::Result<Vec<OsString>> {
    let mut names = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<io::Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}

/// Reject a target equal to or nested inside the source
///
/// The walk would otherwise descend into its own output. Paths that cannot
/// be resolved are not checked; the walk reports them itself.
fn ensure_disjoint(source: &Path, target: &Path) -> Result<(), DeployError> {
    let (Ok(source_abs), Ok(target_abs)) = (source.canonicalize(), resolve_lenient(target))
    else {
        return Ok(());
    };

    if target_abs.starts_with(&source_abs) {
        return Err(DeployError::Config(format!(
            "Target {} must not be inside source {}",
            target.display(),
            source.display()
        )));
    }
    Ok(())
}

/// Canonicalize the longest existing prefix of `path` and append the rest
fn resolve_lenient(path: &Path) -> io::Result<PathBuf> {
    let mut existing = path;
    let mut missing: Vec<&std::ffi::OsStr> = Vec::new();

    loop {
        match existing.canonicalize() {
            Ok(base) => {
                return Ok(missing.iter().rev().fold(base, |acc, part| acc.join(part)));
            }
            Err(e) => match (existing.parent(), existing.file_name()) {
                (Some(parent), Some(name)) => {
                    missing.push(name);
                    existing = if parent.as_os_str().is_empty() {
                        Path::new(".")
                    } else {
                        parent
                    };
                }
                _ => return Err(e),
            },
        }
    }
}
