//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Token bridge - Move design tokens between JSON files and variable stores
#[derive(Parser, Debug)]
#[command(name = "tokens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show how token files are split into base, global and brand files
    Classify {
        /// Token repository root
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the merged foundation or brand tree
    Build {
        /// Token repository root
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Brand to build instead of the foundation
        #[arg(short, long)]
        brand: Option<String>,

        /// Replace aliases with the values they point to
        #[arg(long)]
        resolve: bool,
    },

    /// List the tokens of one file with their full paths
    Flatten {
        /// Token file
        file: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Summarize added, modified and removed tokens between two files
    Diff {
        /// Previous token file
        old: PathBuf,

        /// New token file
        new: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Import token files into a variable store file
    ///
    /// Examples:
    ///   tokens import . --store variables.json
    ///   tokens import design-system -s /tmp/store.json
    Import {
        /// Token repository root
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Variable store file, created when missing
        #[arg(short, long, env = "TOKENS_STORE")]
        store: PathBuf,
    },

    /// Export a variable store file back into token files
    Export {
        /// Token repository root
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Variable store file
        #[arg(short, long, env = "TOKENS_STORE")]
        store: PathBuf,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Branch name to record instead of a generated one
        #[arg(long)]
        branch: Option<String>,
    },
}
