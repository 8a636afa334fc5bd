//! File timestamp comparison for determining recency

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use crate::error::{Error, Result};

/// Timestamp comparator
pub struct TimestampComparator;

impl TimestampComparator {
    /// Check if source file is newer than destination file
    ///
    /// # Errors
    ///
    /// Returns an error if file metadata cannot be read.
    pub fn is_newer(source: &Path, destination: &Path) -> Result<bool> {
        let source_time = Self::modified_time(source)?;
        let dest_time = Self::modified_time(destination)?;

        Ok(source_time > dest_time)
    }

    /// Get the modification time of a file
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata or its modification time is unavailable.
    pub fn modified_time(path: &Path) -> Result<SystemTime> {
        fs::metadata(path)
            .and_then(|metadata| metadata.modified())
            .map_err(|e| Error::io("read modification time of", path, e))
    }
}
