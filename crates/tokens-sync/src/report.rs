//! Reports returned by the import and export pipelines

use serde::{Deserialize, Serialize};
use tokens_core::{ChangeSet, Diagnostic, Diagnostics};

use crate::repository::PullRequest;

/// Report from an import run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    /// False only when there was nothing usable to import
    pub success: bool,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub files_processed: usize,
    pub tokens_processed: usize,
    pub variables_created: usize,
    /// Values written to variables that already existed, counted per mode
    pub variables_updated: usize,
    /// Modes written to, in order
    pub modes: Vec<String>,
}

impl SyncReport {
    /// Create a successful, empty report
    pub fn success() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    /// Create a failed report
    pub fn failure(errors: Vec<Diagnostic>) -> Self {
        Self {
            success: false,
            errors,
            ..Self::default()
        }
    }

    /// Sort diagnostics into errors and warnings
    pub fn absorb(&mut self, diagnostics: Diagnostics) {
        for diagnostic in diagnostics {
            if diagnostic.is_error() {
                tracing::warn!(kind = ?diagnostic.kind, "{}", diagnostic);
                self.errors.push(diagnostic);
            } else {
                tracing::debug!(kind = ?diagnostic.kind, "{}", diagnostic);
                self.warnings.push(diagnostic);
            }
        }
    }
}

/// Changes proposed for one exported file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub changes: ChangeSet,
}

/// Report from an export run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportReport {
    /// Files whose content changed, in write order
    pub files: Vec<FileChange>,
    pub warnings: Vec<Diagnostic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<PullRequest>,
    pub dry_run: bool,
}

impl ExportReport {
    pub fn has_changes(&self) -> bool {
        !self.files.is_empty()
    }

    /// Sum of every file's change set
    pub fn totals(&self) -> ChangeSet {
        let mut totals = ChangeSet::default();
        for file in &self.files {
            totals.added.extend(file.changes.added.iter().cloned());
            totals.modified.extend(file.changes.modified.iter().cloned());
            totals.removed.extend(file.changes.removed.iter().cloned());
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokens_core::DiagnosticKind;

    #[test]
    fn test_absorb_splits_by_severity() {
        let mut report = SyncReport::success();
        let diagnostics: Diagnostics = vec![
            Diagnostic::warning(DiagnosticKind::InvalidNumber, "bad"),
            Diagnostic::error(DiagnosticKind::CyclicReference, "loop"),
        ]
        .into_iter()
        .collect();
        report.absorb(diagnostics);
        assert!(report.success);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_failure_report() {
        let report = SyncReport::failure(vec![Diagnostic::error(DiagnosticKind::Parse, "nothing")]);
        assert!(!report.success);
        assert_eq!(report.files_processed, 0);
    }
}
