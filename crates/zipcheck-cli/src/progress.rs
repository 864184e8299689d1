//! Progress bar for verification runs.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressState;
use indicatif::ProgressStyle;
use std::fmt::Write;
use zipcheck_core::CatalogStats;
use zipcheck_core::VerifyEvent;

/// Byte-based progress bar driven by verification events.
///
/// Sized from the catalog statistics before the run starts; shows the entry
/// being checked as its message. Cleared on drop.
pub struct VerifyProgress {
    bar: ProgressBar,
    files_total: usize,
    files_started: usize,
}

impl VerifyProgress {
    #[must_use]
    pub fn new(stats: &CatalogStats) -> Self {
        let bar = ProgressBar::new(stats.total_size);

        // Template: "[████████░░░░] 4.2 MiB/10.0 MiB (12.5 MiB/s, 1s) [3/12] docs/guide.md"
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "[{bar:40.cyan/blue}] {binary_bytes}/{binary_total_bytes} ({binary_bytes_per_sec}, {eta}) {wide_msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .with_key("eta", |state: &ProgressState, w: &mut dyn Write| {
                    write!(w, "{}", humanize_duration(state.eta())).unwrap_or(());
                })
                .progress_chars("█▓░"),
        );

        Self {
            bar,
            files_total: stats.files,
            files_started: 0,
        }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stderr().is_term()
    }

    /// Advances the bar for one event of the run.
    pub fn observe(&mut self, event: &VerifyEvent) {
        match event {
            VerifyEvent::EntryStarted { path, .. } => {
                self.files_started += 1;
                self.bar.set_message(format!(
                    "[{}/{}] {path}",
                    self.files_started, self.files_total
                ));
            }
            VerifyEvent::BytesRead { count } => self.bar.inc(*count),
            VerifyEvent::Completed(_) => self.bar.finish_and_clear(),
        }
    }
}

impl Drop for VerifyProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Converts duration to human-readable format.
fn humanize_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h{}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m{}s", secs / 60, secs % 60)
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use zipcheck_core::VerificationResult;

    fn stats(files: usize, total_size: u64) -> CatalogStats {
        CatalogStats {
            files,
            total_size,
            directories: 0,
        }
    }

    #[test]
    fn test_humanize_duration() {
        assert_eq!(humanize_duration(Duration::from_secs(0)), "0s");
        assert_eq!(humanize_duration(Duration::from_secs(30)), "30s");
        assert_eq!(humanize_duration(Duration::from_secs(90)), "1m30s");
        assert_eq!(humanize_duration(Duration::from_secs(3661)), "1h1m");
    }

    #[test]
    fn test_progress_tracks_bytes_and_entries() {
        let mut progress = VerifyProgress::new(&stats(2, 100));

        progress.observe(&VerifyEvent::EntryStarted {
            path: "a.txt".into(),
            size: 60,
        });
        progress.observe(&VerifyEvent::BytesRead { count: 60 });
        progress.observe(&VerifyEvent::EntryStarted {
            path: "dir/b.txt".into(),
            size: 40,
        });
        progress.observe(&VerifyEvent::BytesRead { count: 15 });

        assert_eq!(progress.bar.position(), 75);
        assert_eq!(progress.bar.length(), Some(100));
        assert_eq!(progress.bar.message(), "[2/2] dir/b.txt");
    }

    #[test]
    fn test_progress_finishes_on_completed() {
        let mut progress = VerifyProgress::new(&stats(0, 0));
        progress.observe(&VerifyEvent::Completed(VerificationResult::new()));
        assert!(progress.bar.is_finished());
    }
}
