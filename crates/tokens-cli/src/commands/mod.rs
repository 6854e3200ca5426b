//! Command implementations for tokens-cli

pub mod build;
pub mod classify;
pub mod diff;
pub mod export;
pub mod flatten;
pub mod import;

pub use build::run_build;
pub use classify::run_classify;
pub use diff::run_diff;
pub use export::run_export;
pub use flatten::run_flatten;
pub use import::run_import;

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use tokens_core::{
    BrandStructure, Diagnostic, Diagnostics, Outcome, ProcessedFile, StructureClassifier,
    TokenNode, parse_token_file,
};
use tokens_sync::import::fetch_all;
use tokens_sync::{LocalRepository, RepositoryAdapter, SETTINGS_FILE, SyncSettings};

use crate::error::{CliError, Result};

/// Single-threaded runtime for the async pipelines
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

/// Load `tokens.toml` from a repository root
pub fn load_settings(dir: &Path) -> Result<SyncSettings> {
    if !dir.is_dir() {
        return Err(CliError::user(format!("Not a directory: {}", dir.display())));
    }
    Ok(SyncSettings::load(&dir.join(SETTINGS_FILE))?)
}

/// A local repository open for import, export or inspection
pub fn open_repository(dir: &Path, settings: &SyncSettings) -> LocalRepository {
    LocalRepository::with_base_branch(dir, settings.export.base_branch.clone())
}

/// Parsed and classified token files of a repository
pub struct Workspace {
    pub structure: BrandStructure,
    pub files: Vec<ProcessedFile>,
    pub diagnostics: Diagnostics,
}

/// Read, parse and classify every token file under `dir`
pub fn read_workspace(dir: &Path) -> Result<Workspace> {
    let settings = load_settings(dir)?;
    let classifier = StructureClassifier::new(settings.brand_folder_pattern.as_deref())?;
    let repo: Arc<dyn RepositoryAdapter> = Arc::new(open_repository(dir, &settings));

    let fetched = runtime()?.block_on(async {
        let paths = repo
            .list_files(&settings.file_patterns, &settings.exclude_patterns)
            .await?;
        fetch_all(Arc::clone(&repo), paths).await
    })?;

    let mut diagnostics = Diagnostics::new();
    let mut parsed = Vec::new();
    for (path, content) in fetched {
        let Some(text) = content? else {
            continue;
        };
        match parse_token_file(&path, &text) {
            Ok(outcome) => parsed.push((path, outcome.drain_into(&mut diagnostics))),
            Err(e) => diagnostics.push(Diagnostic::error(e.diagnostic_kind(), e.to_string()).at(&path)),
        }
    }

    let paths: Vec<&str> = parsed.iter().map(|(p, _)| p.as_str()).collect();
    let structure = classifier.classify(&paths);
    let files = parsed
        .iter()
        .map(|(path, tokens)| ProcessedFile::classified(path.as_str(), tokens.clone(), &structure))
        .collect();

    Ok(Workspace {
        structure,
        files,
        diagnostics,
    })
}

/// Read and tolerantly parse a single token file
pub fn read_token_file(path: &Path) -> Result<Outcome<TokenNode>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::user(format!("Cannot read {}: {}", path.display(), e)))?;
    Ok(parse_token_file(&path.display().to_string(), &text)?)
}

/// Print diagnostics to stderr
pub fn print_diagnostics<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) {
    for diagnostic in diagnostics {
        let label = if diagnostic.is_error() {
            "error".red().bold()
        } else {
            "warning".yellow().bold()
        };
        eprintln!("{}: {}", label, diagnostic);
    }
}
