//! Docshift CLI
//!
//! Command-line interface for migrating a Nextra documentation tree to Starlight

mod output;
mod progress;

use anyhow::{Context, Result};
use clap::Parser;
use docshift_core::{ConfigLoader, MigrationOptions, Migrator, SyntaxStyle};
use progress::ProgressObserver;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::error;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "docshift")]
#[command(about = "Migrate Nextra MDX documentation to Starlight")]
#[command(version = docshift_core::VERSION)]
#[command(
    long_about = "docshift rewrites a Nextra documentation tree into Starlight content.\n\
Components, links, images, titles and imports are converted file by file and\n\
written to a mirrored output tree.\n\
\n\
Examples:\n  \
docshift                               # Migrate docs-legacy/ into src/content/docs/\n  \
docshift --directive                   # Write callouts as :::note directives\n  \
docshift --ignore drafts,node_modules  # Skip these folders\n  \
docshift --repository https://github.com/org/docs.git"
)]
struct Cli {
    /// Write callouts as block directives instead of components
    #[arg(long)]
    directive: bool,

    /// Folder names to skip, replacing the configured list
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    ignore: Option<Vec<String>>,

    /// Root of the legacy documentation tree
    #[arg(long)]
    source: Option<PathBuf>,

    /// Root the migrated tree is written to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Git URL cloned into the source root when it does not exist
    #[arg(long, env = "DOCSHIFT_REPOSITORY")]
    repository: Option<String>,

    /// Number of documents processed at once
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Configuration file path
    #[arg(short, long, help = "Path to configuration file (docshift.toml)")]
    config: Option<PathBuf>,

    /// Log file, truncated on every run
    #[arg(long, default_value = "docshift.log")]
    log_file: PathBuf,

    /// Also print progress events to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    /// Command-line values win over the configuration file
    fn apply_overrides(&self, options: &mut MigrationOptions) {
        if self.directive {
            options.syntax = SyntaxStyle::Directive;
        }
        if let Some(ignore) = &self.ignore {
            options.ignore = ignore
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(source) = &self.source {
            options.source = source.clone();
        }
        if let Some(output) = &self.output {
            options.output = output.clone();
        }
        if let Some(repository) = &self.repository {
            options.repository = Some(repository.clone());
        }
        if let Some(concurrency) = self.concurrency {
            options.concurrency = concurrency;
        }
    }
}

fn init_tracing(log_file: &Path, verbose: bool) -> Result<()> {
    let file = File::create(log_file)
        .with_context(|| format!("cannot create log file {}", log_file.display()))?;
    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docshift=debug"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_filter(file_filter);
    let stderr_layer = verbose.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .with_filter(EnvFilter::new("docshift=info"))
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("cannot install the tracing subscriber")
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color || std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli).await {
        error!("Migration aborted: {e:#}");
        output::print_fatal(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    init_tracing(&cli.log_file, cli.verbose)?;

    let cwd = std::env::current_dir().context("cannot read the working directory")?;
    let mut options = ConfigLoader::load(cli.config.as_deref(), &cwd)?;
    cli.apply_overrides(&mut options);
    options.validate()?;

    let observer = Arc::new(ProgressObserver::new());
    let migrator = Migrator::new(options, observer.clone());
    let summary = migrator.run().await;
    observer.finish();

    let summary = summary?;
    output::print_summary(&summary, migrator.options(), &cli.log_file);
    Ok(())
}
