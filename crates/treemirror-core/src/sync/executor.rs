//! Whole-file copy with timestamp and permission preservation

use std::fs::{self, File, FileTimes};
use std::io;
use std::path::Path;

/// Copies a single file from the source tree into the destination tree
///
/// Implementations must return the raw [`io::Error`] so the caller can tell
/// a lock conflict apart from a fatal failure.
pub trait FileCopier {
    /// Copy `source` to `dest`, replacing `dest` if it exists
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error of the failed step.
    fn copy(&self, source: &Path, dest: &Path) -> io::Result<u64>;
}

/// Copier backed by the local filesystem
///
/// Duplicates content, then carries over the access and modification times
/// and finally the permission bits of the source.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsCopier;

impl FsCopier {
    /// Create a new filesystem copier
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Make an existing read-only destination writable so it can be replaced
    fn make_writable(dest: &Path) -> io::Result<()> {
        let Ok(metadata) = fs::metadata(dest) else {
            return Ok(());
        };

        let mut permissions = metadata.permissions();
        if permissions.readonly() {
            #[allow(clippy::permissions_set_readonly_false)]
            permissions.set_readonly(false);
            fs::set_permissions(dest, permissions)?;
        }
        Ok(())
    }
}

impl FileCopier for FsCopier {
    fn copy(&self, source: &Path, dest: &Path) -> io::Result<u64> {
        let mut reader = File::open(source)?;
        let metadata = reader.metadata()?;

        Self::make_writable(dest)?;
        let mut writer = File::create(dest)?;
        let bytes = io::copy(&mut reader, &mut writer)?;

        let mut times = FileTimes::new().set_modified(metadata.modified()?);
        if let Ok(accessed) = metadata.accessed() {
            times = times.set_accessed(accessed);
        }
        writer.set_times(times)?;
        writer.sync_all()?;
        drop(writer);

        fs::set_permissions(dest, metadata.permissions())?;
        Ok(bytes)
    }
}
