use indicatif::{ProgressBar, ProgressStyle};
use jplag_sift_core::ProgressReporter;
use std::cell::RefCell;
use std::time::Duration;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// CLI progress reporter using indicatif progress bars.
///
/// - Log phase: spinner
/// - Archive phase: progress bar over the archive entries
pub struct CliReporter {
    bar: RefCell<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: RefCell::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Some(old) = self.bar.borrow_mut().replace(pb) {
            old.finish_and_clear();
        }
    }

    fn finish_bar(&self) {
        if let Some(pb) = self.bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_log_start(&self) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars(TICK_CHARS));
        }
        pb.set_message("Parsing log...");
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_log_complete(&self, clusters: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Log parsed: {} clusters in {:.2}s",
            clusters, duration_secs
        );
    }

    fn on_archive_start(&self, total_entries: usize) {
        let pb = ProgressBar::new(total_entries as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "  {spinner:.cyan} Reading [{bar:30.cyan/dim}] {pos}/{len} entries",
        ) {
            pb.set_style(style.progress_chars("━╸─").tick_chars(TICK_CHARS));
        }
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_archive_progress(&self, entries_read: usize, _total_entries: usize) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.set_position(entries_read as u64);
        }
    }

    fn on_archive_complete(&self, comparisons: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Archive read: {} comparisons in {:.2}s",
            comparisons, duration_secs
        );
    }
}
