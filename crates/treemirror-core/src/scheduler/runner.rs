//! The periodic mirroring loop

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use super::Scheduler;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::shutdown::ShutdownSignal;
use crate::sync::{RetryPolicy, SyncReporter, Synchronizer, check_source_root};

/// What to mirror and how often
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Source tree root
    pub source: PathBuf,
    /// Destination tree root, created on demand
    pub destination: PathBuf,
    /// Time between passes
    pub period: Duration,
}

impl RunOptions {
    /// Build options with a period given in minutes
    #[must_use]
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        period_minutes: u64,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            period: Duration::from_secs(period_minutes.saturating_mul(60)),
        }
    }

    /// Check the roots before entering the loop
    ///
    /// # Errors
    ///
    /// Returns an error if the source root is missing or not a directory, or
    /// if either root lies inside the other.
    pub fn preflight(&self) -> Result<()> {
        check_source_root(&self.source)?;

        let source_root = dunce::canonicalize(&self.source)
            .map_err(|e| Error::io("resolve", &self.source, e))?;
        let dest_root = resolve_lenient(&self.destination);

        if dest_root.starts_with(&source_root) || source_root.starts_with(&dest_root) {
            return Err(Error::OverlappingRoots {
                source_root,
                dest_root,
            });
        }
        Ok(())
    }
}

/// Canonicalize the longest existing prefix of `path` and re-append the rest
fn resolve_lenient(path: &Path) -> PathBuf {
    let mut existing = path.to_path_buf();
    let mut rest = Vec::new();

    loop {
        if let Ok(resolved) = dunce::canonicalize(&existing) {
            return rest.iter().rev().fold(resolved, |acc, part| acc.join(part));
        }
        match (existing.file_name().map(ToOwned::to_owned), existing.parent()) {
            (Some(name), Some(parent)) => {
                rest.push(name);
                existing = parent.to_path_buf();
            }
            _ => return path.to_path_buf(),
        }
    }
}

/// Run one pass and log its outcome
fn run_pass(synchronizer: &Synchronizer, options: &RunOptions) -> Result<()> {
    info!(
        "Synchronizing {} -> {}",
        options.source.display(),
        options.destination.display()
    );
    let report = synchronizer.sync(&options.source, &options.destination)?;

    if report.is_noop() {
        debug!("Destination already up to date");
    }
    info!("{}", SyncReporter::summary(&report));
    Ok(())
}

/// Mirror `options.source` into `options.destination` every period until
/// `shutdown` fires.
///
/// The first pass runs one period after startup unless `config.immediate`
/// is set. Between checks the loop idles for `config.poll_interval()`.
///
/// # Errors
///
/// Returns the first fatal pass error. A shutdown request, including one
/// that interrupts a lock-conflict wait, ends the loop with `Ok(())`.
pub fn run(options: &RunOptions, config: &Config, shutdown: &ShutdownSignal) -> Result<()> {
    options.preflight()?;

    let synchronizer = Synchronizer::new()
        .retry_policy(RetryPolicy::new(config.retry_delay()))
        .shutdown_signal(shutdown.clone());

    let mut scheduler = Scheduler::new();
    let job_options = options.clone();
    scheduler.every(options.period, move || run_pass(&synchronizer, &job_options));

    info!(
        "Mirroring {} to {} every {} minute(s)",
        options.source.display(),
        options.destination.display(),
        options.period.as_secs() / 60
    );

    match drive(&mut scheduler, config, shutdown) {
        Ok(()) | Err(Error::Cancelled) => {
            info!("Synchronization stopped by user.");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Idle/run loop: run due jobs, then idle one poll interval
fn drive(scheduler: &mut Scheduler, config: &Config, shutdown: &ShutdownSignal) -> Result<()> {
    if config.immediate {
        scheduler.run_all()?;
    }

    while !shutdown.is_triggered() {
        scheduler.run_pending()?;
        if shutdown.wait_timeout(config.poll_interval()) {
            break;
        }
    }
    Ok(())
}

/// Run exactly one pass without scheduling
///
/// # Errors
///
/// Returns the pass error, including [`Error::Cancelled`].
pub fn run_once(options: &RunOptions, config: &Config, shutdown: &ShutdownSignal) -> Result<()> {
    options.preflight()?;

    let synchronizer = Synchronizer::new()
        .retry_policy(RetryPolicy::new(config.retry_delay()))
        .shutdown_signal(shutdown.clone());
    run_pass(&synchronizer, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;
    use tempfile::TempDir;

    fn fast_config(immediate: bool) -> Config {
        Config {
            retry_delay_secs: 1,
            poll_interval_ms: 10,
            immediate,
            ..Config::default()
        }
    }

    #[test]
    fn test_period_in_minutes() {
        let options = RunOptions::new("/a", "/b", 5);
        assert_eq!(options.period, Duration::from_secs(300));
    }

    #[test]
    fn test_preflight_missing_source() {
        let tmp = TempDir::new().unwrap();
        let options = RunOptions::new(tmp.path().join("missing"), tmp.path().join("dest"), 1);

        assert!(matches!(options.preflight(), Err(Error::SourceMissing(_))));
    }

    #[test]
    fn test_preflight_rejects_destination_inside_source() {
        let tmp = TempDir::new().unwrap();
        let options = RunOptions::new(tmp.path(), tmp.path().join("backup/new"), 1);

        assert!(matches!(
            options.preflight(),
            Err(Error::OverlappingRoots { .. })
        ));
    }

    #[test]
    fn test_preflight_rejects_source_inside_destination() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("data");
        fs::create_dir(&source).unwrap();
        let options = RunOptions::new(&source, tmp.path(), 1);

        assert!(matches!(
            options.preflight(),
            Err(Error::OverlappingRoots { .. })
        ));
    }

    #[test]
    fn test_preflight_accepts_siblings() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("data");
        fs::create_dir(&source).unwrap();
        let options = RunOptions::new(&source, tmp.path().join("data-mirror"), 1);

        assert!(options.preflight().is_ok());
    }

    #[test]
    fn test_run_once() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("src");
        fs::create_dir_all(source.join("a")).unwrap();
        fs::write(source.join("a/b.txt"), "b").unwrap();
        let options = RunOptions::new(&source, tmp.path().join("dst"), 1);

        run_once(&options, &fast_config(false), &ShutdownSignal::new()).unwrap();

        assert!(tmp.path().join("dst/a/b.txt").is_file());
    }

    #[test]
    fn test_run_stops_on_shutdown() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("src");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("file.txt"), "f").unwrap();
        let options = RunOptions::new(&source, tmp.path().join("dst"), 60);

        let shutdown = ShutdownSignal::new();
        let trigger = shutdown.clone();
        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(200));
            trigger.trigger();
        });

        run(&options, &fast_config(true), &shutdown).unwrap();
        stopper.join().unwrap();

        // The immediate pass ran before the loop started waiting
        assert!(tmp.path().join("dst/file.txt").is_file());
    }

    #[test]
    fn test_run_without_immediate_waits_for_period() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("src");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("file.txt"), "f").unwrap();
        let options = RunOptions::new(&source, tmp.path().join("dst"), 60);

        let shutdown = ShutdownSignal::new();
        let trigger = shutdown.clone();
        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            trigger.trigger();
        });

        run(&options, &fast_config(false), &shutdown).unwrap();
        stopper.join().unwrap();

        assert!(!tmp.path().join("dst").exists());
    }

    #[test]
    fn test_run_with_maximum_period() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("src");
        fs::create_dir(&source).unwrap();
        let options = RunOptions::new(&source, tmp.path().join("dst"), u64::MAX);

        let shutdown = ShutdownSignal::new();
        shutdown.trigger();

        run(&options, &fast_config(false), &shutdown).unwrap();
    }

    #[test]
    fn test_run_ends_on_pass_io_error() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("src");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("file.txt"), "f").unwrap();
        // A regular file where the destination's parent should be
        fs::write(tmp.path().join("blocker"), "not a directory").unwrap();
        let options = RunOptions::new(&source, tmp.path().join("blocker/dst"), 60);

        let err = run(&options, &fast_config(true), &ShutdownSignal::new()).unwrap_err();

        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_run_ends_when_source_vanishes_between_passes() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("src");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("file.txt"), "f").unwrap();
        let options = RunOptions {
            source: source.clone(),
            destination: tmp.path().join("dst"),
            period: Duration::from_millis(300),
        };

        let shutdown = ShutdownSignal::new();
        let remover = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            fs::remove_dir_all(&source).unwrap();
        });
        // Keeps the test from hanging if the loop never sees the failure
        let watchdog_signal = shutdown.clone();
        let watchdog = thread::spawn(move || {
            thread::sleep(Duration::from_secs(10));
            watchdog_signal.trigger();
        });

        let result = run(&options, &fast_config(false), &shutdown);
        remover.join().unwrap();
        drop(watchdog);

        assert!(matches!(result, Err(Error::SourceMissing(_))));
    }

    #[test]
    fn test_run_fails_fast_on_missing_source() {
        let tmp = TempDir::new().unwrap();
        let options = RunOptions::new(tmp.path().join("missing"), tmp.path().join("dst"), 1);

        let err = run(&options, &fast_config(true), &ShutdownSignal::new()).unwrap_err();

        assert!(matches!(err, Error::SourceMissing(_)));
    }
}
