//! Progress reporting.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Receives one call per file transition plus start and end.
pub trait ProgressReport: Send + Sync {
    fn start(&self, files: &[String]);
    fn next_file(&self);
    /// The run completed normally.
    fn stop(&self);
    /// The run ended early.
    fn cancel(&self);
}

/// Reports nothing.
#[derive(Debug, Default)]
pub struct SilentProgress;

impl ProgressReport for SilentProgress {
    fn start(&self, _files: &[String]) {}
    fn next_file(&self) {}
    fn stop(&self) {}
    fn cancel(&self) {}
}

/// Progress bar on stderr.
pub struct IndicatifProgress {
    bar: ProgressBar,
}

impl IndicatifProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} files {msg}") {
            bar.set_style(style.progress_chars("=> "));
        }
        Self { bar }
    }
}

impl Default for IndicatifProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReport for IndicatifProgress {
    fn start(&self, files: &[String]) {
        self.bar.set_length(files.len() as u64);
        self.bar.set_position(0);
    }

    fn next_file(&self) {
        self.bar.inc(1);
    }

    fn stop(&self) {
        self.bar.finish_and_clear();
    }

    fn cancel(&self) {
        self.bar.abandon_with_message("cancelled");
    }
}
