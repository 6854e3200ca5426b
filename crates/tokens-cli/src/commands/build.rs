//! Build command implementation
//!
//! Prints the merged foundation or one brand's merged tree as token JSON.

use std::path::Path;

use tokens_core::{build_all, resolve_tree};

use super::{print_diagnostics, read_workspace};
use crate::error::{CliError, Result};

/// Run the build command
pub fn run_build(dir: &Path, brand: Option<&str>, resolve: bool) -> Result<()> {
    let mut workspace = read_workspace(dir)?;
    let trees = build_all(&workspace.structure, &workspace.files);
    tracing::debug!(stats = ?trees.stats(), "merged token trees");

    let tree = match brand {
        Some(name) => trees.brand(name).ok_or_else(|| {
            let known: Vec<&str> = workspace.structure.brand_names().collect();
            CliError::user(format!(
                "Unknown brand '{}'. Known brands: {}",
                name,
                if known.is_empty() { "none".to_string() } else { known.join(", ") }
            ))
        })?,
        None => &trees.foundation,
    };

    let output = if resolve {
        resolve_tree(tree).drain_into(&mut workspace.diagnostics)
    } else {
        tree.clone()
    };

    println!("{}", serde_json::to_string_pretty(&output.to_json())?);
    print_diagnostics(&workspace.diagnostics);
    Ok(())
}
