//! Diff command implementation
//!
//! Summarizes token-level changes between two token files.

use std::path::Path;

use colored::Colorize;
use serde_json::json;
use tokens_core::{ChangeSet, diff};

use super::{print_diagnostics, read_token_file};
use crate::error::Result;

/// Run the diff command
pub fn run_diff(old: &Path, new: &Path, json: bool) -> Result<()> {
    let (old_tree, mut diagnostics) = read_token_file(old)?.into_parts();
    let new_tree = read_token_file(new)?.drain_into(&mut diagnostics);
    let changes = diff(&old_tree, &new_tree);

    if json {
        let output = json!({
            "has_changes": !changes.is_empty(),
            "changes": changes,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_changes(&changes);
    }
    print_diagnostics(&diagnostics);
    Ok(())
}

/// Print a change set as diff-style lines
pub fn print_changes(changes: &ChangeSet) {
    if changes.is_empty() {
        println!("{} No token changes.", "OK".green().bold());
        return;
    }
    for path in &changes.added {
        println!("  {} {}", "+".green(), path.green());
    }
    for path in &changes.modified {
        println!("  {} {}", "~".yellow(), path.yellow());
    }
    for path in &changes.removed {
        println!("  {} {}", "-".red(), path.red());
    }
    println!();
    println!(
        "{} added, {} modified, {} removed",
        changes.added.len(),
        changes.modified.len(),
        changes.removed.len()
    );
}
