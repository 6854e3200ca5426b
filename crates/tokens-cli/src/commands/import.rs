//! Import command implementation
//!
//! Reads a token repository into a variable store file.

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use tokens_sync::{MemoryStore, SyncReport, import};

use super::{load_settings, open_repository, print_diagnostics, runtime};
use crate::error::{CliError, Result};

/// Run the import command
pub fn run_import(dir: &Path, store_path: &Path) -> Result<()> {
    let settings = load_settings(dir)?;
    let mut store = MemoryStore::load(store_path)?;
    let repo = Arc::new(open_repository(dir, &settings));

    let report = runtime()?.block_on(import(repo, &mut store, &settings))?;
    print_report(&report);

    if !report.success {
        return Err(CliError::user("Nothing was imported"));
    }
    store.save(store_path)?;
    println!(
        "{} Store written to {}",
        "OK".green().bold(),
        store_path.display().to_string().yellow()
    );
    Ok(())
}

fn print_report(report: &SyncReport) {
    print_diagnostics(&report.warnings);
    print_diagnostics(&report.errors);
    if !report.success {
        return;
    }
    println!(
        "{} {} files, {} tokens",
        "Imported".blue().bold(),
        report.files_processed,
        report.tokens_processed
    );
    println!(
        "  {} created, {} updated, modes: {}",
        report.variables_created.to_string().green(),
        report.variables_updated.to_string().yellow(),
        report.modes.join(", ").cyan()
    );
    if !report.warnings.is_empty() || !report.errors.is_empty() {
        println!(
            "  {} warnings, {} errors",
            report.warnings.len(),
            report.errors.len()
        );
    }
}
