//! Decides whether a source file needs to be copied.
//!
//! Staleness is judged on modification time only: a destination file is
//! current unless the source is strictly newer.

mod timestamp;

use std::path::Path;

pub use timestamp::TimestampComparator;

use crate::error::Result;

/// Outcome of comparing a source file with its destination counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Nothing exists at the destination path
    Missing,
    /// Source was modified after the destination copy
    Stale,
    /// Destination is at least as new as the source
    Current,
}

impl Freshness {
    /// Whether the file must be copied
    #[must_use]
    pub const fn needs_copy(self) -> bool {
        matches!(self, Self::Missing | Self::Stale)
    }
}

/// Compare a source file against its destination path
///
/// # Errors
///
/// Returns an error if either file's metadata cannot be read.
pub fn freshness(source: &Path, destination: &Path) -> Result<Freshness> {
    if !destination.exists() {
        return Ok(Freshness::Missing);
    }

    if TimestampComparator::is_newer(source, destination)? {
        Ok(Freshness::Stale)
    } else {
        Ok(Freshness::Current)
    }
}
