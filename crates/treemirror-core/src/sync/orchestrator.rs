//! Sync orchestration - propagate then prune

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use super::SyncReport;
use super::executor::{FileCopier, FsCopier};
use super::retry::RetryPolicy;
use crate::comparison;
use crate::error::{Error, Result};
use crate::shutdown::ShutdownSignal;

/// One-way tree synchronizer
///
/// Each call to [`Synchronizer::sync`] is a self-contained pass. Nothing is
/// cached between passes; every decision is made from the filesystem as it
/// is at the time of the call.
pub struct Synchronizer<C = FsCopier> {
    copier: C,
    retry: RetryPolicy,
    shutdown: ShutdownSignal,
}

impl Default for Synchronizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Synchronizer {
    /// Create a synchronizer that copies through the local filesystem
    #[must_use]
    pub fn new() -> Self {
        Self::with_copier(FsCopier::new())
    }
}

impl<C: FileCopier> Synchronizer<C> {
    /// Create a synchronizer with a custom copier
    #[must_use]
    pub fn with_copier(copier: C) -> Self {
        Self {
            copier,
            retry: RetryPolicy::default(),
            shutdown: ShutdownSignal::new(),
        }
    }

    /// Set the lock-conflict retry policy
    #[must_use]
    pub const fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the signal that interrupts lock-conflict waits
    #[must_use]
    pub fn shutdown_signal(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Run one full pass mirroring `source_root` into `dest_root`
    ///
    /// The prune phase only starts once the propagate phase has finished
    /// for the whole tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceMissing`] if the source root does not exist,
    /// [`Error::Cancelled`] if shutdown was requested during a lock-conflict
    /// wait, and any other filesystem error unchanged.
    pub fn sync(&self, source_root: &Path, dest_root: &Path) -> Result<SyncReport> {
        check_source_root(source_root)?;

        let mut report = SyncReport::default();
        self.propagate(source_root, dest_root, &mut report)?;
        Self::prune(source_root, dest_root, &mut report)?;

        Ok(report)
    }

    /// Create missing directories and copy new or updated files
    fn propagate(
        &self,
        source_root: &Path,
        dest_root: &Path,
        report: &mut SyncReport,
    ) -> Result<()> {
        let walker = WalkDir::new(source_root).sort_by_file_name();

        for entry in walker {
            let entry = entry?;
            let rel_path = relative(source_root, entry.path())?;
            let dest_path = dest_root.join(rel_path);

            if entry.file_type().is_dir() {
                // The destination root may itself be a symlink; links below it are replaced
                if entry.depth() == 0 && dest_path.is_dir() {
                    continue;
                }
                Self::ensure_directory(&dest_path, report)?;
            } else if entry.path().is_file() {
                self.sync_file(entry.path(), &dest_path, report)?;
            } else {
                debug!("Skipping non-regular entry: {}", entry.path().display());
            }
        }

        Ok(())
    }

    fn ensure_directory(dest_dir: &Path, report: &mut SyncReport) -> Result<()> {
        match destination_kind(dest_dir)? {
            DestKind::Directory => return Ok(()),
            DestKind::Missing => {}
            DestKind::Symlink | DestKind::Other => remove_file(dest_dir, report)?,
        }

        fs::create_dir_all(dest_dir).map_err(|e| Error::io("create directory", dest_dir, e))?;
        info!("Created directory: {}", dest_dir.display());
        report.directories_created += 1;
        Ok(())
    }

    fn sync_file(&self, source: &Path, dest: &Path, report: &mut SyncReport) -> Result<()> {
        match destination_kind(dest)? {
            DestKind::Directory => remove_directory(dest, report)?,
            DestKind::Symlink => remove_file(dest, report)?,
            DestKind::Missing | DestKind::Other => {}
        }

        if !comparison::freshness(source, dest)?.needs_copy() {
            report.files_current += 1;
            return Ok(());
        }

        let (_, retries) = self
            .retry
            .run(source, &self.shutdown, || self.copier.copy(source, dest))?;

        report.lock_retries += u64::from(retries);
        info!("Copied file: {} to {}", source.display(), dest.display());
        report.files_copied += 1;
        Ok(())
    }

    /// Delete destination entries that no longer exist at the source
    fn prune(source_root: &Path, dest_root: &Path, report: &mut SyncReport) -> Result<()> {
        let mut walker = WalkDir::new(dest_root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry?;
            let rel_path = relative(dest_root, entry.path())?;
            let source_path = source_root.join(rel_path);

            if entry.file_type().is_dir() {
                if !source_path.is_dir() {
                    // Release the walker's handle on the directory before removing it
                    walker.skip_current_dir();
                    remove_directory(entry.path(), report)?;
                }
            } else if !source_path.is_file() {
                remove_file(entry.path(), report)?;
            }
        }

        Ok(())
    }
}

/// Fail fast when the source root is absent or not a directory
///
/// # Errors
///
/// Returns [`Error::SourceMissing`] or [`Error::NotADirectory`].
pub fn check_source_root(source_root: &Path) -> Result<()> {
    if !source_root.exists() {
        return Err(Error::SourceMissing(source_root.to_path_buf()));
    }
    if !source_root.is_dir() {
        return Err(Error::NotADirectory(source_root.to_path_buf()));
    }
    Ok(())
}

fn relative<'a>(root: &Path, path: &'a Path) -> Result<&'a Path> {
    path.strip_prefix(root).map_err(|e| {
        Error::io("resolve relative path of", PathBuf::from(path), io::Error::other(e))
    })
}

/// What currently occupies a destination path, without following symlinks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DestKind {
    Missing,
    Directory,
    Symlink,
    Other,
}

fn destination_kind(path: &Path) -> Result<DestKind> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.file_type().is_symlink() => Ok(DestKind::Symlink),
        Ok(metadata) if metadata.is_dir() => Ok(DestKind::Directory),
        Ok(_) => Ok(DestKind::Other),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(DestKind::Missing),
        Err(e) => Err(Error::io("read metadata of", path, e)),
    }
}

fn remove_file(path: &Path, report: &mut SyncReport) -> Result<()> {
    fs::remove_file(path)
        .or_else(|e| {
            // Windows directory symlinks are removed as directories
            if cfg!(windows) && path.is_symlink() {
                fs::remove_dir(path)
            } else {
                Err(e)
            }
        })
        .map_err(|e| Error::io("remove file", path, e))?;
    info!("Removed file: {}", path.display());
    report.files_removed += 1;
    Ok(())
}

fn remove_directory(path: &Path, report: &mut SyncReport) -> Result<()> {
    fs::remove_dir_all(path).map_err(|e| Error::io("remove directory", path, e))?;
    info!("Removed directory: {}", path.display());
    report.directories_removed += 1;
    Ok(())
}
