//! Progress and logging hooks for a migration run
//!
//! One observer instance is handed to a [`Migrator`](crate::Migrator) and lives
//! exactly as long as that run. Every hook has a no-op default so callers only
//! implement what they display.

use crate::pipeline::FileOutcome;
use std::path::Path;
use tracing::{debug, info, warn};

pub trait MigrationObserver: Send + Sync {
    fn on_fetch_started(&self, _url: &str) {}

    fn on_fetch_finished(&self, _url: &str, _ok: bool) {}

    /// Called once discovery knows how many documents will be processed
    fn on_discovered(&self, _total: usize) {}

    fn on_file_started(&self, _path: &Path) {}

    /// Called before each transformer runs on a document
    fn on_transform(&self, _path: &Path, _transformer: &str) {}

    fn on_file_finished(&self, _path: &Path, _outcome: &FileOutcome) {}

    /// A transformer message about one document
    fn log(&self, path: &Path, source: &str, message: &str) {
        debug!(file = %path.display(), source, "{message}");
    }
}

/// Observer that only writes `tracing` events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl MigrationObserver for TracingObserver {
    fn on_fetch_started(&self, url: &str) {
        info!("Cloning {url}");
    }

    fn on_fetch_finished(&self, url: &str, ok: bool) {
        if ok {
            info!("Cloned {url}");
        } else {
            warn!("Clone of {url} failed");
        }
    }

    fn on_discovered(&self, total: usize) {
        info!("Found {total} documents");
    }

    fn on_file_finished(&self, path: &Path, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Migrated { stats, .. } => {
                debug!(file = %path.display(), "migrated ({stats})")
            }
            FileOutcome::Skipped { reason } => {
                info!(file = %path.display(), "skipped: {reason}")
            }
            FileOutcome::Failed { message } => {
                warn!(file = %path.display(), "failed: {message}")
            }
        }
    }
}
