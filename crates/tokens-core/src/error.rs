//! Error types for tokens-core

use crate::diagnostics::{Diagnostic, DiagnosticKind};

/// Result type for tokens-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tokens-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid color value: {value}")]
    InvalidColor { value: String },

    #[error("Invalid number value: {value}")]
    InvalidNumber { value: String },

    #[error("Invalid boolean value: {value}")]
    InvalidBoolean { value: String },

    #[error("Unresolved reference: {{{reference}}}")]
    UnresolvedReference { reference: String },

    #[error("Cyclic reference: {}", chain.join(" -> "))]
    CyclicReference { chain: Vec<String> },

    #[error("Invalid pattern {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn invalid_color(value: impl Into<String>) -> Self {
        Self::InvalidColor {
            value: value.into(),
        }
    }

    /// The diagnostic category this error is reported under
    pub fn diagnostic_kind(&self) -> DiagnosticKind {
        match self {
            Self::Parse { .. } | Self::Json(_) => DiagnosticKind::Parse,
            Self::InvalidColor { .. } => DiagnosticKind::InvalidColor,
            Self::InvalidNumber { .. } => DiagnosticKind::InvalidNumber,
            Self::InvalidBoolean { .. } => DiagnosticKind::InvalidBoolean,
            Self::UnresolvedReference { .. } => DiagnosticKind::UnresolvedReference,
            Self::CyclicReference { .. } => DiagnosticKind::CyclicReference,
            Self::InvalidPattern { .. } | Self::InvalidArgument(_) => DiagnosticKind::InvalidArgument,
        }
    }

    /// Demote this error to a warning so processing can continue
    pub fn to_warning(&self) -> Diagnostic {
        Diagnostic::warning(self.diagnostic_kind(), self.to_string())
    }

    /// Report this error without aborting the surrounding operation
    pub fn to_error(&self) -> Diagnostic {
        Diagnostic::error(self.diagnostic_kind(), self.to_string())
    }
}
