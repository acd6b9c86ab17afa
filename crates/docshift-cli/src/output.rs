//! End-of-run reporting

use colored::*;
use docshift_core::{MigrationOptions, MigrationSummary};
use std::path::Path;

/// Print the run summary and every failed document
pub fn print_summary(summary: &MigrationSummary, options: &MigrationOptions, log_file: &Path) {
    println!("\n{}", "Summary:".bold());
    println!(
        "  Documents: {} ({} → {})",
        summary.total,
        options.source.display(),
        options.output.display()
    );
    println!("  Migrated: {}", summary.migrated.to_string().green());
    if summary.skipped > 0 {
        println!(
            "  Skipped: {} (untranslated pages)",
            summary.skipped.to_string().yellow()
        );
    }
    if summary.has_failures() {
        println!("  Failed: {}", summary.failed.len().to_string().red());
        for (path, message) in &summary.failed {
            println!("    {} {}: {}", "✗".red(), path.display(), message);
        }
    }
    println!("  Time: {:.2?}", summary.elapsed);

    if summary.has_failures() {
        println!(
            "\n{} Some documents were not migrated, see {} for details",
            "⚠".yellow(),
            log_file.display()
        );
    } else {
        println!("\n{} Migration complete", "✓".green());
    }
}

/// Report an error that ended the run
pub fn print_fatal(error: &anyhow::Error) {
    eprintln!("{} {error:#}", "error:".red().bold());
}
