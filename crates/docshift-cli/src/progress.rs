//! Live progress display

use colored::*;
use docshift_core::{FileOutcome, MigrationObserver};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}";

/// Observer that draws a progress bar on stderr
pub struct ProgressObserver {
    bar: ProgressBar,
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressObserver {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        Self {
            bar,
            spinner: Mutex::new(None),
        }
    }

    /// Remove the bar before the summary is printed
    pub fn finish(&self) {
        if let Ok(mut spinner) = self.spinner.lock()
            && let Some(spinner) = spinner.take()
        {
            spinner.finish_and_clear();
        }
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationObserver for ProgressObserver {
    fn on_fetch_started(&self, url: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_message(format!("Cloning {url}"));
        spinner.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(spinner);
        }
    }

    fn on_fetch_finished(&self, url: &str, ok: bool) {
        let Some(spinner) = self.spinner.lock().ok().and_then(|mut s| s.take()) else {
            return;
        };
        if ok {
            spinner.finish_with_message(format!("{} Cloned {url}", "✓".green()));
        } else {
            spinner.finish_with_message(format!("{} Could not clone {url}", "✗".red()));
        }
    }

    fn on_discovered(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.reset_elapsed();
    }

    fn on_file_started(&self, path: &Path) {
        self.bar.set_message(path.display().to_string());
    }

    fn on_transform(&self, path: &Path, transformer: &str) {
        self.bar
            .set_message(format!("{} ({transformer})", path.display()));
    }

    fn on_file_finished(&self, path: &Path, outcome: &FileOutcome) {
        if let FileOutcome::Failed { message } = outcome {
            self.bar
                .println(format!("{} {}: {message}", "✗".red(), path.display()));
        }
        self.bar.inc(1);
    }

    fn log(&self, path: &Path, source: &str, message: &str) {
        debug!(file = %path.display(), source, "{message}");
    }
}
