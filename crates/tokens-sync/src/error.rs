//! Error types for tokens-sync

use std::path::PathBuf;

/// Result type for tokens-sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tokens-sync operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] tokens_core::Error),

    #[error("Invalid settings: {message}")]
    Settings { message: String },

    #[error("Invalid settings file {path}: {message}")]
    SettingsFile { path: PathBuf, message: String },

    #[error("Collection not found: {name}")]
    CollectionNotFound { name: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Branch not found: {name}")]
    BranchNotFound { name: String },

    #[error("Branch already exists: {name}")]
    BranchExists { name: String },

    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] globset::Error),

    #[error("Invalid base64 content: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings {
            message: message.into(),
        }
    }
}
