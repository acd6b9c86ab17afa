//! Migration orchestrator
//!
//! Resolves the source tree, discovers documents and migrates them
//! concurrently. A failing document is recorded in the summary and never
//! stops its siblings; only an unresolvable source tree or an invalid
//! configuration ends the run with an error.

use crate::{
    config::MigrationOptions,
    detect::LanguageDetector,
    fetch,
    observer::{MigrationObserver, TracingObserver},
    parse::parse,
    paths::FileContext,
    print::print,
    transform::{TransformContext, TransformStats, TransformerRegistry},
    MigrateError, Result,
};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Directories never descended into, on top of the configured ignore list
const ALWAYS_IGNORED: &[&str] = &[".git"];

/// What happened to one document
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Migrated { output: PathBuf, stats: TransformStats },
    /// Filtered out before transformation (wrong language for its locale)
    Skipped { reason: String },
    Failed { message: String },
}

/// Totals for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationSummary {
    pub total: usize,
    pub migrated: usize,
    pub skipped: usize,
    /// Source path and error message of every failed document
    pub failed: Vec<(PathBuf, String)>,
    pub elapsed: Duration,
}

impl MigrationSummary {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    fn record(&mut self, path: &Path, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Migrated { .. } => self.migrated += 1,
            FileOutcome::Skipped { .. } => self.skipped += 1,
            FileOutcome::Failed { message } => self.failed.push((path.to_path_buf(), message.clone())),
        }
    }
}

/// Runs the transformer chain over a documentation tree
pub struct Migrator {
    options: MigrationOptions,
    observer: Arc<dyn MigrationObserver>,
    registry: TransformerRegistry,
    detector: LanguageDetector,
}

impl Migrator {
    pub fn new(options: MigrationOptions, observer: Arc<dyn MigrationObserver>) -> Self {
        let registry = TransformerRegistry::standard(&options);
        let detector = LanguageDetector::new(&options.detection);
        Self {
            options,
            observer,
            registry,
            detector,
        }
    }

    /// Migrator that reports through `tracing` only
    pub fn with_tracing(options: MigrationOptions) -> Self {
        Self::new(options, Arc::new(TracingObserver))
    }

    pub fn options(&self) -> &MigrationOptions {
        &self.options
    }

    pub fn registry(&self) -> &TransformerRegistry {
        &self.registry
    }

    /// Migrate every document under the source root
    pub async fn run(&self) -> Result<MigrationSummary> {
        let started = Instant::now();
        self.options.validate()?;
        let chain = self.registry.names()?;
        debug!("Transformer chain: {}", chain.join(" → "));

        fetch::ensure_source(
            &self.options.source,
            self.options.repository.as_deref(),
            self.observer.as_ref(),
        )
        .await?;

        let files = self.discover()?;
        info!(
            "Migrating {} documents from {} to {}",
            files.len(),
            self.options.source.display(),
            self.options.output.display()
        );
        self.observer.on_discovered(files.len());

        let outcomes: Vec<(PathBuf, FileOutcome)> = stream::iter(files)
            .map(|path| async move {
                let outcome = self.process_file(&path).await;
                (path, outcome)
            })
            .buffer_unordered(self.options.concurrency)
            .collect()
            .await;

        let mut summary = MigrationSummary {
            total: outcomes.len(),
            ..Default::default()
        };
        for (path, outcome) in &outcomes {
            summary.record(path, outcome);
        }
        summary.failed.sort();
        summary.elapsed = started.elapsed();

        info!(
            "Migrated {}/{} documents ({} skipped, {} failed) in {:.2?}",
            summary.migrated,
            summary.total,
            summary.skipped,
            summary.failed.len(),
            summary.elapsed
        );
        Ok(summary)
    }

    /// Documents under the source root, sorted, skipping ignored directories
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let root = &self.options.source;
        let ignored = |name: &str| {
            ALWAYS_IGNORED.contains(&name) || self.options.ignore.iter().any(|i| i == name)
        };

        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !entry.file_name().to_str().is_some_and(&ignored)
            });
        for entry in walker {
            let entry = entry.map_err(|e| MigrateError::io_error(root, std::io::Error::other(e)))?;
            if entry.file_type().is_file() && self.options.is_document(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Parse, transform and print one document
    pub fn migrate_text(&self, text: &str, file: &FileContext) -> Result<String> {
        self.migrate_document(text, file).map(|(out, _)| out)
    }

    fn migrate_document(&self, text: &str, file: &FileContext) -> Result<(String, TransformStats)> {
        let mut doc = parse(text).map_err(|e| MigrateError::Parse {
            file: file.relative().to_path_buf(),
            message: e.to_string(),
        })?;
        let ctx = TransformContext::new(&self.options, file, self.observer.as_ref());
        let stats = self.registry.run_all(&mut doc, &ctx)?;
        Ok((print(&doc), stats))
    }

    async fn process_file(&self, path: &Path) -> FileOutcome {
        let file = FileContext::from_source(&self.options.source, path);
        self.observer.on_file_started(file.relative());

        let outcome = match self.migrate_file(path, &file).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Failed to migrate {}: {e}", path.display());
                FileOutcome::Failed {
                    message: e.to_string(),
                }
            }
        };
        self.observer.on_file_finished(file.relative(), &outcome);
        outcome
    }

    async fn migrate_file(&self, path: &Path, file: &FileContext) -> Result<FileOutcome> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| MigrateError::io_error(path, e))?;

        if !self.detector.should_keep(&text, file) {
            let locale = file.locale().unwrap_or_default();
            return Ok(FileOutcome::Skipped {
                reason: format!("content does not look like '{locale}'"),
            });
        }

        let (migrated, stats) = self.migrate_document(&text, file)?;
        let output = file.output_path(&self.options.output);
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| MigrateError::io_error(parent, e))?;
        }
        tokio::fs::write(&output, migrated)
            .await
            .map_err(|e| MigrateError::io_error(&output, e))?;
        Ok(FileOutcome::Migrated { output, stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn options_for(dir: &TempDir) -> MigrationOptions {
        MigrationOptions {
            source: dir.path().join("legacy"),
            output: dir.path().join("out"),
            ..Default::default()
        }
    }

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_discovery_prunes_ignored_directories() {
        let dir = TempDir::new().unwrap();
        let options = options_for(&dir);
        write(&options.source, "b.mdx", "B");
        write(&options.source, "a/page.md", "A");
        write(&options.source, "a/notes.txt", "skip");
        write(&options.source, "node_modules/pkg/readme.md", "skip");
        write(&options.source, ".git/x.md", "skip");

        let migrator = Migrator::with_tracing(options.clone());
        let files: Vec<PathBuf> = migrator
            .discover()
            .unwrap()
            .into_iter()
            .map(|p| p.strip_prefix(&options.source).unwrap().to_path_buf())
            .collect();
        assert_eq!(files, vec![PathBuf::from("a/page.md"), PathBuf::from("b.mdx")]);
    }

    #[test]
    fn test_migrate_text_runs_the_whole_chain() {
        let migrator = Migrator::with_tracing(MigrationOptions::default());
        let src = "import { Callout } from 'nextra/components'\n\n# Getting Started\n\n<Callout type=\"info\">Read [this](./next.md).</Callout>\n";
        let out = migrator
            .migrate_text(src, &FileContext::new("guides/start.mdx"))
            .unwrap();
        assert_eq!(
            out,
            "---\ntitle: Getting Started\n---\n\nimport { Aside } from '@astrojs/starlight/components';\n\n<Aside type=\"note\">Read [this](/guides/next).</Aside>\n"
        );
    }

    #[test]
    fn test_parse_errors_name_the_file() {
        let migrator = Migrator::with_tracing(MigrationOptions::default());
        let err = migrator
            .migrate_text("<Callout>\nnever closed\n", &FileContext::new("broken.mdx"))
            .unwrap_err();
        assert!(matches!(err, MigrateError::Parse { ref file, .. } if file == Path::new("broken.mdx")));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_run_isolates_failures_and_skips_untranslated_pages() {
        let dir = TempDir::new().unwrap();
        let options = options_for(&dir);
        write(&options.source, "intro.mdx", "# Intro\n\nHello\n");
        write(&options.source, "broken.mdx", "<Tabs>\nunclosed\n");
        write(&options.source, "ja/intro.mdx", "# Intro\n\nThis page was never translated.\n");

        let summary = Migrator::with_tracing(options.clone()).run().await.unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.migrated, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed.len(), 1);
        assert!(summary.failed[0].0.ends_with("broken.mdx"));

        let written = fs::read_to_string(options.output.join("intro.mdx")).unwrap();
        assert_eq!(written, "---\ntitle: Intro\n---\n\nHello\n");
        assert!(!options.output.join("ja/intro.mdx").exists());
    }

    #[tokio::test]
    async fn test_missing_source_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = Migrator::with_tracing(options_for(&dir)).run().await.unwrap_err();
        assert!(matches!(err, MigrateError::SourceNotFound(_)));
    }
}
