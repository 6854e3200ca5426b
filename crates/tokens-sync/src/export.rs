//! Variable store to repository export
//!
//! The primary mode becomes the base token file. Under the `auto` strategy
//! every other mode becomes a brand override file holding only the tokens
//! whose value differs from the primary mode. Each output is diffed against
//! the file already in the repository and only changed files are proposed,
//! on a fresh branch with a pull request.

use tokens_core::path::split_variable_name;
use tokens_core::{
    CanonicalValue, Diagnostic, DiagnosticKind, Diagnostics, Leaf, TokenNode, diff,
    parse_token_file, unflatten,
};

use crate::changelog::{render_body, render_title};
use crate::config::{ModeStrategy, SyncSettings};
use crate::error::{Error, Result};
use crate::report::{ExportReport, FileChange};
use crate::repository::{PullRequestDraft, RepositoryAdapter};
use crate::store::{Mode, ModeId, Variable, VariableStore};

/// Options for an export run
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Compute changes without creating a branch or writing files
    pub dry_run: bool,
    /// Branch to create instead of `<branch_prefix>-<unix-seconds>`
    pub branch: Option<String>,
}

/// Export the configured collection as token files and propose the changes.
///
/// # Errors
///
/// Returns an error when the collection is missing, the store fails, or a
/// repository operation fails.
pub async fn export(
    store: &dyn VariableStore,
    repo: &dyn RepositoryAdapter,
    settings: &SyncSettings,
    options: &ExportOptions,
) -> Result<ExportReport> {
    settings.validate()?;
    let mut diagnostics = Diagnostics::new();
    let outputs = build_outputs(store, settings, &mut diagnostics)?;

    let mut changed = Vec::new();
    for (path, tree) in outputs {
        let previous = match repo.fetch_file(&path).await? {
            Some(text) => match parse_token_file(&path, &text) {
                Ok(outcome) => outcome.value,
                Err(e) => {
                    diagnostics.push(e.to_warning().at(&path));
                    TokenNode::group()
                }
            },
            None => TokenNode::group(),
        };
        let changes = diff(&previous, &tree);
        if changes.is_empty() {
            tracing::debug!(path = %path, "unchanged, skipping");
            continue;
        }
        tracing::info!(
            path = %path,
            added = changes.added.len(),
            modified = changes.modified.len(),
            removed = changes.removed.len(),
            "file changed"
        );
        changed.push((FileChange { path, changes }, tree));
    }

    let mut report = ExportReport {
        files: changed.iter().map(|(change, _)| change.clone()).collect(),
        warnings: diagnostics.into_vec(),
        dry_run: options.dry_run,
        ..ExportReport::default()
    };
    if changed.is_empty() || options.dry_run {
        return Ok(report);
    }

    let branch = options.branch.clone().unwrap_or_else(|| {
        format!(
            "{}-{}",
            settings.export.branch_prefix,
            chrono::Utc::now().timestamp()
        )
    });
    repo.create_branch(&branch, &settings.export.base_branch).await?;

    let title = render_title(&report.files);
    for (change, tree) in &changed {
        let mut content = serde_json::to_string_pretty(&tree.to_json())?;
        content.push('\n');
        repo.write_file(&branch, &change.path, &content, &title).await?;
    }

    let pull_request = repo
        .open_pull_request(&PullRequestDraft {
            branch: branch.clone(),
            base: settings.export.base_branch.clone(),
            title,
            body: render_body(&report.files),
        })
        .await?;
    tracing::info!(url = %pull_request.url, "opened pull request");

    report.branch = Some(branch);
    report.pull_request = Some(pull_request);
    Ok(report)
}

/// Rebuild the output trees from the store: the primary mode first, then one
/// override tree per remaining mode under the `auto` strategy.
pub fn build_outputs(
    store: &dyn VariableStore,
    settings: &SyncSettings,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<(String, TokenNode)>> {
    let collection = store
        .find_collection(&settings.collection)?
        .ok_or_else(|| Error::CollectionNotFound {
            name: settings.collection.clone(),
        })?;
    let modes = store.modes(collection)?;
    let primary = primary_mode(&modes, settings)?;
    let variables = store.variables(collection)?;

    let mut base_values = Vec::with_capacity(variables.len());
    for variable in &variables {
        base_values.push(store.value(variable.id, primary.id)?);
    }

    let mut base = TokenNode::group();
    for (variable, value) in variables.iter().zip(&base_values) {
        if let Some(value) = value {
            place(variable, value, &mut base, diagnostics);
        }
    }
    let mut outputs = vec![(settings.export.path.clone(), base)];

    if settings.modes.strategy == ModeStrategy::Auto {
        for mode in modes.iter().filter(|m| m.id != primary.id) {
            let tree = override_tree(store, &variables, &base_values, mode.id, diagnostics)?;
            outputs.push((settings.export.brand_file(&mode.name), tree));
        }
    }
    Ok(outputs)
}

/// The mode exported to the base file. Under `auto` a collection without a
/// `Default` mode falls back to its first mode; under `target` the named mode
/// must exist.
fn primary_mode<'a>(modes: &'a [Mode], settings: &SyncSettings) -> Result<&'a Mode> {
    let name = settings.primary_mode();
    if let Some(mode) = modes.iter().find(|m| m.name == name) {
        return Ok(mode);
    }
    match settings.modes.strategy {
        ModeStrategy::Auto => modes
            .first()
            .ok_or_else(|| Error::Store(format!("collection '{}' has no modes", settings.collection))),
        ModeStrategy::Target => Err(Error::Store(format!(
            "target mode '{}' does not exist in collection '{}'",
            name, settings.collection
        ))),
    }
}

fn override_tree(
    store: &dyn VariableStore,
    variables: &[Variable],
    base_values: &[Option<CanonicalValue>],
    mode: ModeId,
    diagnostics: &mut Diagnostics,
) -> Result<TokenNode> {
    let mut tree = TokenNode::group();
    for (variable, base_value) in variables.iter().zip(base_values) {
        let Some(value) = store.value(variable.id, mode)? else {
            continue;
        };
        if base_value.as_ref() != Some(&value) {
            place(variable, &value, &mut tree, diagnostics);
        }
    }
    Ok(tree)
}

fn place(variable: &Variable, value: &CanonicalValue, into: &mut TokenNode, diagnostics: &mut Diagnostics) {
    let mut leaf = Leaf::new(value.to_scalar()).with_type(variable.kind.type_name());
    leaf.comment = variable.description.clone();

    let path = split_variable_name(&variable.name);
    match unflatten(&path, leaf, into) {
        Ok(conflicts) => diagnostics.extend(conflicts),
        Err(e) => diagnostics.push(
            Diagnostic::warning(DiagnosticKind::UnflattenConflict, e.to_string()).at(&variable.name),
        ),
    }
}
