//! One-way synchronization engine
//!
//! A pass runs in two phases. The propagate phase walks the source tree,
//! creating missing destination directories and copying files that are new
//! or strictly newer at the source. The prune phase then walks the
//! destination tree and deletes every file or directory with no source
//! counterpart. Copies blocked by another process's lock are retried through
//! [`RetryPolicy`].

mod executor;
mod orchestrator;
mod reporting;
mod retry;

pub use executor::{FileCopier, FsCopier};
pub use orchestrator::{Synchronizer, check_source_root};
pub use reporting::SyncReporter;
pub use retry::RetryPolicy;

/// Statistics for a single pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Destination directories created
    pub directories_created: u64,
    /// Files copied because they were missing or stale
    pub files_copied: u64,
    /// Files left alone because the destination was current
    pub files_current: u64,
    /// Destination files deleted
    pub files_removed: u64,
    /// Destination directory trees deleted
    pub directories_removed: u64,
    /// Copy attempts repeated after a lock conflict
    pub lock_retries: u64,
}

impl SyncReport {
    /// Total create, copy and delete actions performed
    #[must_use]
    pub const fn total_operations(&self) -> u64 {
        self.directories_created + self.files_copied + self.files_removed + self.directories_removed
    }

    /// Whether the pass changed nothing on disk
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.total_operations() == 0
    }
}
