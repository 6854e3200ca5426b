//! Export command implementation
//!
//! Writes the variable store back into token files and records a pull
//! request description for review.

use std::path::Path;

use colored::Colorize;
use tokens_sync::{ExportOptions, ExportReport, MemoryStore, export};

use super::diff::print_changes;
use super::{load_settings, open_repository, print_diagnostics, runtime};
use crate::error::{CliError, Result};

/// Run the export command
pub fn run_export(dir: &Path, store_path: &Path, dry_run: bool, branch: Option<String>) -> Result<()> {
    if !store_path.exists() {
        return Err(CliError::user(format!(
            "Store file not found: {}",
            store_path.display()
        )));
    }
    let settings = load_settings(dir)?;
    let store = MemoryStore::load(store_path)?;
    let repo = open_repository(dir, &settings);
    let options = ExportOptions { dry_run, branch };

    let report = runtime()?.block_on(export(&store, &repo, &settings, &options))?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &ExportReport) {
    print_diagnostics(&report.warnings);
    if !report.has_changes() {
        println!("{} Token files are up to date.", "OK".green().bold());
        return;
    }

    for file in &report.files {
        println!("{} {}", "File".blue().bold(), file.path.yellow());
        print_changes(&file.changes);
        println!();
    }

    if report.dry_run {
        println!("Dry run: {} files would change.", report.files.len());
        return;
    }
    if let Some(branch) = &report.branch {
        println!("{} {}", "Branch".bold(), branch.cyan());
    }
    if let Some(pr) = &report.pull_request {
        println!("{} #{} {}", "Pull request".bold(), pr.number, pr.url.cyan());
    }
}
