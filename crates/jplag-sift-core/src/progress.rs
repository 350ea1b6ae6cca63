/// Trait for reporting run progress.
///
/// The CLI implements it with indicatif; library callers can ignore it.
/// All methods have default no-op implementations.
pub trait ProgressReporter {
    fn on_log_start(&self) {}
    fn on_log_complete(&self, _clusters: usize, _duration_secs: f64) {}
    fn on_archive_start(&self, _total_entries: usize) {}
    fn on_archive_progress(&self, _entries_read: usize, _total_entries: usize) {}
    fn on_archive_complete(&self, _comparisons: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
