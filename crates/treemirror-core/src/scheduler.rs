//! Periodic job scheduling
//!
//! [`Scheduler`] owns its job list and its [`Clock`]; nothing is registered
//! globally. The caller drives it by calling [`Scheduler::run_pending`] from
//! its own loop. A job's next run is computed from the moment it finishes,
//! so firings missed during a long run collapse into a single deferred one
//! and runs never overlap.

mod clock;
mod runner;

use std::fmt;
use std::time::{Duration, Instant};

pub use clock::{Clock, SystemClock};
pub use runner::{RunOptions, run, run_once};

use crate::error::Result;

/// A unit of scheduled work
pub type Job = Box<dyn FnMut() -> Result<()>>;

struct ScheduledJob {
    interval: Duration,
    /// `None` when the interval reaches past what [`Instant`] can represent
    next_run: Option<Instant>,
    job: Job,
}

impl fmt::Debug for ScheduledJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledJob")
            .field("interval", &self.interval)
            .field("next_run", &self.next_run)
            .finish_non_exhaustive()
    }
}

/// Fixed-interval job scheduler
#[derive(Debug)]
pub struct Scheduler<C = SystemClock> {
    clock: C,
    jobs: Vec<ScheduledJob>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// Create a scheduler driven by the system clock
    #[must_use]
    pub const fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> Scheduler<C> {
    /// Create a scheduler driven by `clock`
    #[must_use]
    pub const fn with_clock(clock: C) -> Self {
        Self {
            clock,
            jobs: Vec::new(),
        }
    }

    /// Register `job` to run every `interval`, first due one interval from now
    ///
    /// A job whose next run falls beyond the range of [`Instant`] is never due.
    pub fn every(
        &mut self,
        interval: Duration,
        job: impl FnMut() -> Result<()> + 'static,
    ) {
        self.jobs.push(ScheduledJob {
            interval,
            next_run: self.clock.now().checked_add(interval),
            job: Box::new(job),
        });
    }

    /// Run every job that is due, returning how many ran
    ///
    /// # Errors
    ///
    /// Stops at and returns the first job error. The failing job is still
    /// rescheduled.
    pub fn run_pending(&mut self) -> Result<usize> {
        let now = self.clock.now();
        let mut ran = 0;

        for index in 0..self.jobs.len() {
            if self.jobs[index].next_run.is_some_and(|next| next <= now) {
                self.run_job(index)?;
                ran += 1;
            }
        }

        Ok(ran)
    }

    /// Run every job immediately regardless of due time
    ///
    /// # Errors
    ///
    /// Stops at and returns the first job error.
    pub fn run_all(&mut self) -> Result<usize> {
        for index in 0..self.jobs.len() {
            self.run_job(index)?;
        }
        Ok(self.jobs.len())
    }

    fn run_job(&mut self, index: usize) -> Result<()> {
        let result = (self.jobs[index].job)();
        let finished = self.clock.now();
        let scheduled = &mut self.jobs[index];
        scheduled.next_run = finished.checked_add(scheduled.interval);
        result
    }

    /// Earliest time any job is due
    #[must_use]
    pub fn next_run(&self) -> Option<Instant> {
        self.jobs.iter().filter_map(|job| job.next_run).min()
    }

    /// Time until the next job is due, zero if one is overdue
    #[must_use]
    pub fn idle_time(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.next_run()
            .map(|next| next.saturating_duration_since(now))
    }

    /// Number of registered jobs
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether no jobs are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
