//! Progress reporting

use console::{style, Term};
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Instant;

/// Spinner-based reporter for tree operations and uploads
pub struct ProgressReporter {
    bar: ProgressBar,
    started_at: Option<Instant>,
    files: u64,
    bytes: u64,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new_spinner())
    }

    /// Reporter that draws nothing
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    /// Spinner on an interactive stderr, hidden when output is redirected
    pub fn for_stderr() -> Self {
        Self::for_terminal(Term::stderr().is_term())
    }

    fn for_terminal(is_term: bool) -> Self {
        if is_term {
            Self::new()
        } else {
            Self::hidden()
        }
    }

    fn with_bar(bar: ProgressBar) -> Self {
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        Self {
            bar,
            started_at: None,
            files: 0,
            bytes: 0,
        }
    }

    /// Mark start of an operation.
    pub fn start(&mut self, label: &str) {
        self.started_at = Some(Instant::now());
        self.files = 0;
        self.bytes = 0;
        self.bar.enable_steady_tick(std::time::Duration::from_millis(120));
        self.bar.set_message(format!("{}...", label));
    }

    /// Update current file indicator.
    pub fn set_current_file(&self, action: &str, path: &Path) {
        self.bar
            .set_message(format!("{} {} ({} files so far)", action, path.display(), self.files));
    }

    /// Mark one file complete.
    pub fn complete_file(&mut self, bytes: u64) {
        self.files += 1;
        self.bytes = self.bytes.saturating_add(bytes);
    }

    /// Surface a skipped entry without disturbing the spinner.
    pub fn entry_error(&self, action: &str, path: &Path, err: &str) {
        self.bar.println(format!(
            "{} {} {}: {}",
            style("ERROR").red().bold(),
            action,
            path.display(),
            err
        ));
    }

    /// Finalize the operation.
    pub fn finish(&self, files: usize, failed: usize, bytes: u64) {
        let status = if failed == 0 {
            style("Done").green().to_string()
        } else {
            style("Done with errors").yellow().to_string()
        };
        self.bar.finish_with_message(format!(
            "{}: {} files, {} failed | {} | {}/s",
            status,
            files,
            failed,
            HumanBytes(bytes),
            HumanBytes(self.current_throughput_bps())
        ));
    }

    /// Stop the spinner after a fatal error.
    pub fn abandon(&self, message: &str) {
        self.bar
            .abandon_with_message(format!("{} {}", style("Failed").red().bold(), message));
    }

    fn current_throughput_bps(&self) -> u64 {
        match self.started_at {
            Some(started) => {
                let secs = started.elapsed().as_secs_f64();
                if secs > 0.0 {
                    (self.bytes as f64 / secs) as u64
                } else {
                    0
                }
            }
            None => 0,
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}
