//! Token bridge CLI
//!
//! Inspects token repositories and moves tokens between token files and a
//! variable store file.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    tracing::debug!("Verbose mode enabled");
    execute_command(cli.command)
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Classify { dir, json } => commands::run_classify(&dir, json),
        Commands::Build {
            dir,
            brand,
            resolve,
        } => commands::run_build(&dir, brand.as_deref(), resolve),
        Commands::Flatten { file, json } => commands::run_flatten(&file, json),
        Commands::Diff { old, new, json } => commands::run_diff(&old, &new, json),
        Commands::Import { dir, store } => commands::run_import(&dir, &store),
        Commands::Export {
            dir,
            store,
            dry_run,
            branch,
        } => commands::run_export(&dir, &store, dry_run, branch),
    }
}
