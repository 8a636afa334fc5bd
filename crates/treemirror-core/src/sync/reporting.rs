//! Pass reporting and statistics

use std::fmt::Write;

use super::SyncReport;

/// Sync pass reporter
pub struct SyncReporter;

impl SyncReporter {
    /// Generate a summary report
    #[must_use]
    pub fn summary(report: &SyncReport) -> String {
        let mut output = String::new();

        output.push_str("=== Sync Summary ===\n");
        let _ = writeln!(output, "Directories created: {}", report.directories_created);
        let _ = writeln!(output, "Files copied:        {}", report.files_copied);
        let _ = writeln!(output, "Files up to date:    {}", report.files_current);
        let _ = writeln!(output, "Files removed:       {}", report.files_removed);
        let _ = writeln!(output, "Directories removed: {}", report.directories_removed);

        if report.lock_retries > 0 {
            let _ = writeln!(output, "Lock retries:        {}", report.lock_retries);
        }

        let _ = write!(output, "Total operations: {}", report.total_operations());
        output
    }
}
