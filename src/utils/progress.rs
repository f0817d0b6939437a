//! Progress indicators for long-running phases.
//!
//! Thin wrapper over [`indicatif`] with a consistent style and a quiet mode
//! for CI and non-interactive environments. Clones share the same underlying
//! bar, so a counter can be handed to concurrently resolving branches.

use std::time::Duration;

use indicatif::ProgressStyle as IndicatifStyle;

/// A progress indicator that may be a live spinner, a counter, or hidden.
#[derive(Clone)]
pub struct ProgressBar {
    inner: indicatif::ProgressBar,
}

impl ProgressBar {
    /// An animated spinner with a message, for indeterminate work.
    pub fn new_spinner(message: impl Into<String>, quiet: bool) -> Self {
        if quiet {
            return Self {
                inner: indicatif::ProgressBar::hidden(),
            };
        }
        let inner = indicatif::ProgressBar::new_spinner();
        inner.set_style(spinner_style());
        inner.enable_steady_tick(Duration::from_millis(100));
        inner.set_message(message.into());
        Self { inner }
    }

    /// A `pos/len` counter whose length grows as work is discovered.
    pub fn new_counter(message: impl Into<String>, quiet: bool) -> Self {
        if quiet {
            return Self {
                inner: indicatif::ProgressBar::hidden(),
            };
        }
        let inner = indicatif::ProgressBar::new(0);
        inner.set_style(counter_style());
        inner.set_message(message.into());
        Self { inner }
    }

    /// Add `n` units of discovered work.
    pub fn inc_length(&self, n: u64) {
        self.inner.inc_length(n);
    }

    /// Mark `n` units of work completed.
    pub fn inc(&self, n: u64) {
        self.inner.inc(n);
    }

    /// Stop the indicator, replacing it with a final message.
    pub fn finish_with_message(&self, message: impl Into<String>) {
        self.inner.finish_with_message(message.into());
    }
}

fn spinner_style() -> IndicatifStyle {
    IndicatifStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "])
}

fn counter_style() -> IndicatifStyle {
    IndicatifStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap()
        .progress_chars("━╸━")
}
