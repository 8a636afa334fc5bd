//! Error types for the treemirror library

use std::io;
use std::path::PathBuf;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Windows `ERROR_SHARING_VIOLATION`
const ERROR_SHARING_VIOLATION: i32 = 32;
/// Windows `ERROR_LOCK_VIOLATION`
const ERROR_LOCK_VIOLATION: i32 = 33;

/// Errors raised while mirroring a tree
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source root does not exist
    #[error("Source directory does not exist: {}", .0.display())]
    SourceMissing(PathBuf),

    /// A root path exists but is not a directory
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Source and destination overlap, so mirroring would recurse or prune the source
    #[error("Source {} and destination {} overlap", .source_root.display(), .dest_root.display())]
    OverlappingRoots {
        /// Resolved source root
        source_root: PathBuf,
        /// Resolved destination root
        dest_root: PathBuf,
    },

    /// A filesystem operation failed
    #[error("Failed to {op} {}: {source}", .path.display())]
    Io {
        /// Operation that failed, e.g. "copy" or "remove directory"
        op: &'static str,
        /// Path the operation was applied to
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Directory traversal failed
    #[error("Failed to walk directory tree: {0}")]
    Walk(#[from] walkdir::Error),

    /// A config file could not be read or parsed
    #[error("Failed to load config file {}: {message}", .path.display())]
    Config {
        /// Config file path
        path: PathBuf,
        /// Parser or reader message
        message: String,
    },

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The pass was interrupted by a shutdown request
    #[error("Synchronization cancelled")]
    Cancelled,
}

impl Error {
    /// Wrap an I/O error with the operation and path it came from
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Whether this error is a cancellation rather than a failure
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Check whether an I/O error means another process holds the file with
/// sharing denied.
///
/// Missing files and plain permission errors are not lock conflicts.
#[must_use]
pub fn is_lock_conflict(err: &io::Error) -> bool {
    if cfg!(windows)
        && matches!(
            err.raw_os_error(),
            Some(ERROR_SHARING_VIOLATION | ERROR_LOCK_VIOLATION)
        )
    {
        return true;
    }

    matches!(
        err.kind(),
        io::ErrorKind::ResourceBusy | io::ErrorKind::ExecutableFileBusy | io::ErrorKind::WouldBlock
    )
}
