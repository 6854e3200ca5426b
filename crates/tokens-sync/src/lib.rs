//! Import and export pipelines between token repositories and variable stores
//!
//! This crate wires the `tokens-core` engine to its two I/O collaborators:
//!
//! - a [`VariableStore`] holding collections, modes and per-mode values
//! - a [`RepositoryAdapter`] listing, reading and writing token files and
//!   opening pull requests
//!
//! [`import()`] reads every matching file, merges foundation and brand trees
//! and writes them into the store as modes. [`export()`] walks the store
//! back into token files, diffs them against the repository and proposes
//! the changes on a new branch.

pub mod changelog;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod report;
pub mod repository;
pub mod store;

pub use config::{ExportSettings, ModeSettings, ModeStrategy, SETTINGS_FILE, SyncSettings};
pub use error::{Error, Result};
pub use export::{ExportOptions, export};
pub use import::import;
pub use report::{ExportReport, FileChange, SyncReport};
pub use repository::{
    LocalRepository, MemoryRepository, PullRequest, PullRequestDraft, RepositoryAdapter,
};
pub use store::{CollectionId, MemoryStore, Mode, ModeId, Variable, VariableId, VariableStore};
