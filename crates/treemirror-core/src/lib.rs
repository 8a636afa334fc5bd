//! # treemirror-core
//!
//! Core library for one-way periodic directory mirroring.
//!
//! A [`Synchronizer`] brings a destination tree into correspondence with a
//! source tree in a single pass: new and updated files are copied across,
//! and anything that only exists at the destination is pruned. A
//! [`Scheduler`] re-runs that pass on a fixed period until a
//! [`ShutdownSignal`] fires.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;

/// Modification-time based change detection
pub mod comparison;

/// Layered TOML configuration
pub mod config;

/// Periodic job scheduling
pub mod scheduler;

/// Cooperative cancellation shared between the control loop and a pass
pub mod shutdown;

/// One-way tree synchronization engine
pub mod sync;

pub use config::{Config, ConfigManager};
pub use error::{Error, Result};
pub use scheduler::{Clock, Scheduler, SystemClock};
pub use shutdown::ShutdownSignal;
pub use sync::{FileCopier, FsCopier, RetryPolicy, SyncReport, SyncReporter, Synchronizer};
