//! Progress reporting module

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use wordlist_core::ProgressReporter;

/// Terminal progress bar for the primary output
///
/// The bar length is the pre-scanned input line count; its position is the
/// number of payload lines written, so a run that drops lines finishes short
/// of 100%.
pub struct BarReporter {
    progress_bar: ProgressBar,
    tick: Duration,
}

impl BarReporter {
    /// Create a new bar drawn to stderr
    pub fn new(tick: Duration) -> Self {
        Self {
            progress_bar: ProgressBar::new(0),
            tick,
        }
    }

    #[cfg(test)]
    fn hidden() -> Self {
        Self {
            progress_bar: ProgressBar::hidden(),
            tick: Duration::ZERO,
        }
    }

    #[cfg(test)]
    fn position(&self) -> u64 {
        self.progress_bar.position()
    }

    #[cfg(test)]
    fn length(&self) -> Option<u64> {
        self.progress_bar.length()
    }
}

impl ProgressReporter for BarReporter {
    fn start(&mut self, total: u64) {
        self.progress_bar.set_length(total);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} lines {msg}")
        {
            self.progress_bar.set_style(style.progress_chars("##-"));
        }
        if !self.tick.is_zero() {
            self.progress_bar.enable_steady_tick(self.tick);
        }
    }

    fn update(&mut self, written: u64, _total: u64, percent: u8) {
        self.progress_bar.set_position(written);
        self.progress_bar.set_message(format!("{percent}%"));
    }

    fn finish(&mut self) {
        self.progress_bar.finish_with_message("Complete");
    }
}
