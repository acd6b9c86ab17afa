//! Source tree resolution
//!
//! The legacy documentation is read from a local directory. When that
//! directory is missing and a repository URL is configured, a shallow clone
//! is made first. The clone is awaited before any file is processed and a
//! failed clone ends the run.

use crate::{observer::MigrationObserver, MigrateError, Result};
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

/// Make sure `source` exists, cloning `repository` into it when needed
pub async fn ensure_source(
    source: &Path,
    repository: Option<&str>,
    observer: &dyn MigrationObserver,
) -> Result<()> {
    if source.is_dir() {
        debug!("Using local source tree {}", source.display());
        return Ok(());
    }
    let Some(url) = repository else {
        return Err(MigrateError::SourceNotFound(source.to_path_buf()));
    };

    if let Some(parent) = source.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| MigrateError::io_error(parent, e))?;
    }

    info!("Source tree {} not found, cloning {url}", source.display());
    observer.on_fetch_started(url);
    let result = shallow_clone(url, source).await;
    observer.on_fetch_finished(url, result.is_ok());
    result
}

async fn shallow_clone(url: &str, dest: &Path) -> Result<()> {
    let output = Command::new("git")
        .args(["clone", "--depth", "1", "--quiet", url])
        .arg(dest)
        .output()
        .await
        .map_err(|e| MigrateError::Fetch {
            url: url.to_string(),
            message: format!("could not run git: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MigrateError::Fetch {
            url: url.to_string(),
            message: stderr.trim().to_string(),
        });
    }
    if !dest.is_dir() {
        return Err(MigrateError::SourceNotFound(dest.to_path_buf()));
    }
    Ok(())
}
