//! Classify command implementation
//!
//! Shows how the repository's token files are partitioned.

use std::path::Path;

use colored::Colorize;
use serde_json::json;
use tokens_core::BrandStructure;

use super::{print_diagnostics, read_workspace};
use crate::error::Result;

/// Run the classify command
pub fn run_classify(dir: &Path, json: bool) -> Result<()> {
    let workspace = read_workspace(dir)?;
    let structure = &workspace.structure;

    if json {
        let output = json!({
            "multiBrand": structure.is_multi_brand(),
            "structure": structure,
            "diagnostics": workspace.diagnostics,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_structure(dir, structure);
        print_diagnostics(&workspace.diagnostics);
    }
    Ok(())
}

fn print_structure(dir: &Path, structure: &BrandStructure) {
    let layout = if structure.is_multi_brand() {
        "multi-brand".cyan()
    } else {
        "single-brand".cyan()
    };
    println!(
        "{} {} ({}, {} files)",
        "Tokens".blue().bold(),
        dir.display().to_string().yellow(),
        layout,
        structure.file_count()
    );

    print_section("Base", &structure.base_files);
    print_section("Global", &structure.global_files);
    for brand in &structure.brands {
        print_section(&format!("Brand {}", brand.name), &brand.files);
    }
}

fn print_section(title: &str, files: &[String]) {
    if files.is_empty() {
        return;
    }
    println!();
    println!("{}", format!("{}:", title).bold());
    for file in files {
        println!("  {}", file);
    }
}
