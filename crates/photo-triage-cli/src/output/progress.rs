//! Scoring progress on stderr using indicatif.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};
use photo_triage_core::{ProgressEvent, ProgressSink};

enum Mode {
    Quiet,
    /// Only failed uploads are reported.
    Plain,
    Bar(IndicatifBar),
}

/// Progress bar adapter for CLI output.
pub struct ProgressBar {
    mode: Mode,
}

impl ProgressBar {
    /// Creates a progress reporter.
    ///
    /// `total` sizes the bar up front when the file count is known; the
    /// ingestor corrects it once the batch starts. `quiet` wins over
    /// `show_bar`.
    #[must_use]
    pub fn new(total: Option<u64>, quiet: bool, show_bar: bool) -> Self {
        let mode = match (quiet, show_bar) {
            (true, _) => Mode::Quiet,
            (false, false) => Mode::Plain,
            (false, true) => {
                let bar = total.map_or_else(IndicatifBar::new_spinner, IndicatifBar::new);
                if let Ok(style) = ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                {
                    bar.set_style(style.progress_chars("#>-"));
                }
                Mode::Bar(bar)
            }
        };
        Self { mode }
    }
}

impl ProgressSink for ProgressBar {
    fn on_event(&self, event: ProgressEvent) {
        match (&self.mode, event) {
            (Mode::Quiet, _) => {}
            (Mode::Bar(bar), ProgressEvent::Started { total, .. }) => {
                bar.set_length(total as u64);
            }
            (Mode::Bar(bar), ProgressEvent::Completed { name, score, .. }) => {
                bar.set_message(format!("{name}: {score}"));
                bar.inc(1);
            }
            (mode, ProgressEvent::Skipped { name, reason }) => {
                if let Mode::Bar(bar) = mode {
                    bar.inc(1);
                }
                eprintln!("WARN: Skipping {name}: {reason}");
            }
            (Mode::Bar(bar), ProgressEvent::Finished { processed, skipped }) => {
                bar.finish_with_message(format!("Done: {processed} scored, {skipped} skipped"));
            }
            (Mode::Plain, _) => {}
        }
    }
}
