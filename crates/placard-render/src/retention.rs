//! Removal of expired generated files.

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

/// Counters from one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Files deleted.
    pub removed: usize,
    /// Files younger than the cutoff.
    pub kept: usize,
    /// Files that could not be inspected or deleted.
    pub failed: usize,
}

/// Delete regular files in `dir` whose modification time is older than
/// `max_age`.
///
/// Subdirectories are left alone. Failures on individual files are logged
/// and counted; a missing directory yields an empty report.
pub fn sweep_older_than(dir: &Path, max_age: Duration) -> SweepReport {
    let mut report = SweepReport::default();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(dir = %dir.display(), error = %err, "Nothing to sweep");
            return report;
        }
    };

    let now = SystemTime::now();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "Failed to read directory entry");
                report.failed += 1;
                continue;
            }
        };
        let path = entry.path();

        let modified = match entry.metadata().and_then(|meta| {
            if meta.is_file() {
                meta.modified().map(Some)
            } else {
                Ok(None)
            }
        }) {
            Ok(Some(modified)) => modified,
            Ok(None) => continue,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Failed to inspect file");
                report.failed += 1;
                continue;
            }
        };

        // Modification times in the future count as fresh
        let age = now.duration_since(modified).unwrap_or_default();
        if age <= max_age {
            report.kept += 1;
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), age_secs = age.as_secs(), "Removed expired file");
                report.removed += 1;
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Failed to remove expired file");
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        dir = %dir.display(),
        removed = report.removed,
        kept = report.kept,
        failed = report.failed,
        "Swept generated files"
    );
    report
}
