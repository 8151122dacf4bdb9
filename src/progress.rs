//! Spinner shown while a backend call is in flight.
//!
//! The spinner draws on stderr and is hidden in quiet mode (`--quiet` or
//! `CIFINDER_QUIET`) and when stderr is not a terminal, so piped output and
//! CI logs stay clean. It is cleared before any result is printed.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

pub const TEMPLATE_SPINNER: &str = "{spinner} {msg}";

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Configuration for progress display behavior
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressConfig {
    /// Whether to suppress all progress output
    pub quiet_mode: bool,
}

impl ProgressConfig {
    /// Create progress configuration from environment and CLI arguments
    pub fn from_env(quiet: bool) -> Self {
        let env_quiet = std::env::var("CIFINDER_QUIET").is_ok();
        Self {
            quiet_mode: quiet || env_quiet,
        }
    }

    pub fn should_show_progress(&self) -> bool {
        !self.quiet_mode && std::io::stderr().is_terminal()
    }

    /// Create a spinner with the given message
    ///
    /// Returns a hidden progress bar if progress should not be shown
    pub fn create_spinner(&self, msg: &str) -> ProgressBar {
        if !self.should_show_progress() {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template(TEMPLATE_SPINNER)
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars(TICK_CHARS),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Run `work` behind a spinner, clearing it afterwards whatever the
    /// outcome.
    pub fn with_spinner<T>(&self, msg: &str, work: impl FnOnce() -> T) -> T {
        let spinner = self.create_spinner(msg);
        let result = work();
        spinner.finish_and_clear();
        result
    }
}
