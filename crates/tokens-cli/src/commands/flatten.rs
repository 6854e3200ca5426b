//! Flatten command implementation

use std::path::Path;

use colored::Colorize;
use tokens_core::{TokenKind, flatten};

use super::{print_diagnostics, read_token_file};
use crate::error::Result;

/// Run the flatten command
pub fn run_flatten(file: &Path, json: bool) -> Result<()> {
    let (tree, diagnostics) = read_token_file(file)?.into_parts();
    let tokens = flatten(&tree);

    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        for token in &tokens {
            let kind = TokenKind::infer(token.token_type.as_deref(), &token.value);
            println!(
                "{} = {} {}",
                token.dot_path().bold(),
                token.value,
                format!("({})", kind).dimmed()
            );
        }
    }
    print_diagnostics(&diagnostics);
    Ok(())
}
