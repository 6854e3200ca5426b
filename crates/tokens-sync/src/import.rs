//! Repository to variable store import
//!
//! Files are fetched concurrently and then processed in listing order:
//! parse, classify, merge into foundation and brand trees, resolve aliases,
//! flatten, convert and write into the store. Files that cannot be fetched
//! or parsed are skipped with a warning, and other problems with individual
//! tokens are collected in the [`SyncReport`]. Only failures of the store or
//! repository adapters abort the run.

use std::sync::Arc;

use tokio::task::JoinSet;
use tokens_core::{
    Diagnostic, DiagnosticKind, Diagnostics, FileCategory, ProcessedFile, StructureClassifier,
    TokenKind, TokenNode, build_all, flatten, parse_token_file, resolve_tree, to_canonical,
};

use crate::config::{DEFAULT_MODE, ModeStrategy, SyncSettings};
use crate::error::Result;
use crate::report::SyncReport;
use crate::repository::RepositoryAdapter;
use crate::store::{CollectionId, VariableStore, ensure_mode};

/// Fetch every path concurrently. Results come back in the order of `paths`.
pub async fn fetch_all(
    repo: Arc<dyn RepositoryAdapter>,
    paths: Vec<String>,
) -> Result<Vec<(String, Result<Option<String>>)>> {
    let mut tasks = JoinSet::new();
    for (index, path) in paths.into_iter().enumerate() {
        let repo = Arc::clone(&repo);
        tasks.spawn(async move {
            let content = repo.fetch_file(&path).await;
            (index, path, content)
        });
    }

    let mut fetched = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        fetched.push(joined?);
    }
    fetched.sort_by_key(|(index, _, _)| *index);
    Ok(fetched
        .into_iter()
        .map(|(_, path, content)| (path, content))
        .collect())
}

/// Import token files from `repo` into `store`.
///
/// # Errors
///
/// Returns an error when the settings are invalid, the file listing fails,
/// or the store rejects an operation. Unparseable files and unconvertible
/// tokens are reported, not raised.
pub async fn import(
    repo: Arc<dyn RepositoryAdapter>,
    store: &mut dyn VariableStore,
    settings: &SyncSettings,
) -> Result<SyncReport> {
    settings.validate()?;
    let classifier = StructureClassifier::new(settings.brand_folder_pattern.as_deref())?;

    let paths = repo
        .list_files(&settings.file_patterns, &settings.exclude_patterns)
        .await?;
    tracing::info!(files = paths.len(), "importing token files");

    let mut report = SyncReport::success();
    let mut failures = Diagnostics::new();
    let mut parsed = Vec::new();
    for (path, content) in fetch_all(Arc::clone(&repo), paths).await? {
        let text = match content {
            Ok(Some(text)) => text,
            Ok(None) => {
                failures.push(
                    Diagnostic::warning(DiagnosticKind::Repository, "file disappeared before it could be read")
                        .at(&path),
                );
                continue;
            }
            Err(e) => {
                failures.push(Diagnostic::warning(DiagnosticKind::Repository, e.to_string()).at(&path));
                continue;
            }
        };
        match parse_token_file(&path, &text) {
            Ok(outcome) => {
                let tokens = outcome.drain_into(&mut failures);
                parsed.push((path, tokens));
            }
            Err(e) => failures.push(e.to_warning().at(&path)),
        }
    }

    if parsed.is_empty() {
        let mut report = SyncReport::failure(vec![Diagnostic::error(
            DiagnosticKind::Parse,
            format!(
                "no token files could be parsed from patterns: {}",
                settings.file_patterns.join(", ")
            ),
        )]);
        report.absorb(failures);
        return Ok(report);
    }
    report.absorb(failures);
    report.files_processed = parsed.len();

    let paths: Vec<&str> = parsed.iter().map(|(path, _)| path.as_str()).collect();
    let structure = classifier.classify(&paths);
    let files: Vec<ProcessedFile> = parsed
        .iter()
        .map(|(path, tokens)| ProcessedFile::classified(path.as_str(), tokens.clone(), &structure))
        .collect();
    tracing::debug!(
        brands = structure.brands.len(),
        base = files.iter().filter(|f| f.category == FileCategory::Base).count(),
        "classified token files"
    );

    let trees = build_all(&structure, &files);
    let mut plan: Vec<(String, &TokenNode)> = Vec::new();
    match settings.modes.strategy {
        ModeStrategy::Auto => {
            plan.push((DEFAULT_MODE.to_string(), &trees.foundation));
            for brand in &trees.brands {
                if brand.name.eq_ignore_ascii_case(DEFAULT_MODE) {
                    report.errors.push(
                        Diagnostic::error(
                            DiagnosticKind::Store,
                            format!(
                                "brand '{}' collides with the {} mode and was not imported",
                                brand.name, DEFAULT_MODE
                            ),
                        )
                        .at(&brand.name),
                    );
                    continue;
                }
                plan.push((brand.name.clone(), &brand.tree));
            }
        }
        ModeStrategy::Target => {
            let tree = match settings.modes.brand.as_deref() {
                Some(name) => trees.brand(name).unwrap_or_else(|| {
                    report.errors.push(Diagnostic::error(
                        DiagnosticKind::Store,
                        format!("brand '{}' not found, importing the foundation instead", name),
                    ));
                    &trees.foundation
                }),
                None => &trees.foundation,
            };
            plan.push((settings.primary_mode().to_string(), tree));
        }
    }

    let collection = store.get_or_create_collection(&settings.collection)?;
    for (mode_name, tree) in plan {
        write_mode(store, collection, &mode_name, tree, &mut report)?;
        report.modes.push(mode_name);
    }

    tracing::info!(
        created = report.variables_created,
        updated = report.variables_updated,
        warnings = report.warnings.len(),
        errors = report.errors.len(),
        "import complete"
    );
    Ok(report)
}

/// Resolve, convert and store one merged tree as the values of one mode
fn write_mode(
    store: &mut dyn VariableStore,
    collection: CollectionId,
    mode_name: &str,
    tree: &TokenNode,
    report: &mut SyncReport,
) -> Result<()> {
    let mode = ensure_mode(store, collection, mode_name)?;
    let mut diagnostics = Diagnostics::new();
    let resolved = resolve_tree(tree).drain_into(&mut diagnostics);

    for token in flatten(&resolved) {
        report.tokens_processed += 1;
        let name = token.slash_path();
        let kind = TokenKind::infer(token.token_type.as_deref(), &token.value);
        let value = match to_canonical(kind, &token.value) {
            Ok(outcome) => outcome.drain_into(&mut diagnostics),
            Err(e) => {
                diagnostics.push(e.to_warning().at(token.dot_path()));
                continue;
            }
        };

        let (variable, created) = store.get_or_create_variable(collection, &name, kind)?;
        if variable.kind != kind {
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticKind::KindMismatch,
                    format!("variable is {} but the token is {}", variable.kind, kind),
                )
                .at(token.dot_path()),
            );
            continue;
        }
        store.set_value(variable.id, mode, value)?;
        if token.comment.is_some() && token.comment != variable.description {
            store.set_description(variable.id, token.comment.as_deref())?;
        }
        if created {
            report.variables_created += 1;
        } else {
            report.variables_updated += 1;
        }
    }

    tracing::debug!(mode = mode_name, "wrote mode values");
    report.absorb(diagnostics);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;
    use crate::store::MemoryStore;

    fn repo(files: &[(&str, &str)]) -> Arc<dyn RepositoryAdapter> {
        let repo = files
            .iter()
            .fold(MemoryRepository::default(), |repo, (path, content)| repo.with_file(*path, content));
        Arc::new(repo)
    }

    #[tokio::test]
    async fn test_fetch_all_keeps_listing_order() {
        let repo = repo(&[("b.json", "B"), ("a.json", "A")]);
        let fetched = fetch_all(repo, vec!["b.json".into(), "missing.json".into(), "a.json".into()])
            .await
            .unwrap();
        let order: Vec<&str> = fetched.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(order, vec!["b.json", "missing.json", "a.json"]);
        assert!(matches!(fetched[1].1, Ok(None)));
    }

    #[tokio::test]
    async fn test_single_file_import() {
        let repo = repo(&[(
            "tokens/base.json",
            r##"{"color": {"brand": {"value": "#ff0000", "type": "color", "comment": "Primary"}}, "space": {"sm": {"value": "4px"}}}"##,
        )]);
        let mut store = MemoryStore::new();
        let report = import(repo, &mut store, &SyncSettings::default()).await.unwrap();

        assert!(report.success);
        assert_eq!(report.files_processed, 1);
        assert_eq!(report.tokens_processed, 2);
        assert_eq!(report.variables_created, 2);
        assert_eq!(report.modes, vec![DEFAULT_MODE]);

        let collection = store.find_collection("Design Tokens").unwrap().unwrap();
        let variables = store.variables(collection).unwrap();
        assert_eq!(variables[0].name, "color/brand");
        assert_eq!(variables[0].description.as_deref(), Some("Primary"));
        assert_eq!(variables[1].kind, TokenKind::Number);
    }

    #[tokio::test]
    async fn test_nothing_parseable_is_failure() {
        let repo = repo(&[("tokens/broken.json", "{\"a\": ")]);
        let mut store = MemoryStore::new();
        let report = import(repo, &mut store, &SyncSettings::default()).await.unwrap();
        assert!(!report.success);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, DiagnosticKind::Parse);
        assert_eq!(store.find_collection("Design Tokens").unwrap(), None);
    }

    #[tokio::test]
    async fn test_broken_file_is_skipped_with_warning() {
        let repo = repo(&[
            ("tokens/base.json", r#"{"a": {"value": 1}}"#),
            ("tokens/broken.json", "{\"a\": "),
        ]);
        let mut store = MemoryStore::new();
        let report = import(repo, &mut store, &SyncSettings::default()).await.unwrap();

        assert!(report.success);
        assert!(report.errors.is_empty());
        assert_eq!(report.files_processed, 1);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, DiagnosticKind::Parse);
        assert_eq!(report.warnings[0].path.as_deref(), Some("tokens/broken.json"));
        assert_eq!(report.variables_created, 1);
    }

    #[tokio::test]
    async fn test_brand_named_like_default_mode_is_rejected() {
        let repo = repo(&[
            ("tokens/base.json", r##"{"c": {"value": "#000000"}}"##),
            ("tokens/brands/Default/colors.json", r##"{"c": {"value": "#ff0000"}}"##),
        ]);
        let mut store = MemoryStore::new();
        let report = import(repo, &mut store, &SyncSettings::default()).await.unwrap();

        assert_eq!(report.modes, vec![DEFAULT_MODE]);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, DiagnosticKind::Store);

        let collection = store.find_collection("Design Tokens").unwrap().unwrap();
        let modes = store.modes(collection).unwrap();
        assert_eq!(modes.len(), 1);
        let variable = store.variables(collection).unwrap()[0].clone();
        assert_eq!(
            store.value(variable.id, modes[0].id).unwrap(),
            Some(tokens_core::CanonicalValue::Color(
                tokens_core::to_canonical_color("#000000").unwrap()
            ))
        );
    }

    #[tokio::test]
    async fn test_no_matching_files_is_failure() {
        let repo = repo(&[("docs/readme.md", "# hi")]);
        let mut store = MemoryStore::new();
        let report = import(repo, &mut store, &SyncSettings::default()).await.unwrap();
        assert!(!report.success);
    }

    #[tokio::test]
    async fn test_bad_values_become_warnings() {
        let repo = repo(&[(
            "tokens/base.json",
            r#"{"bad": {"value": "not-a-color", "type": "color"}, "ok": {"value": true}}"#,
        )]);
        let mut store = MemoryStore::new();
        let report = import(repo, &mut store, &SyncSettings::default()).await.unwrap();
        assert!(report.success);
        assert_eq!(report.variables_created, 1);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, DiagnosticKind::InvalidColor);
        assert_eq!(report.warnings[0].path.as_deref(), Some("bad"));
    }

    #[tokio::test]
    async fn test_reimport_counts_updates() {
        let files = [("tokens/base.json", r#"{"a": {"value": 1}, "b": {"value": 2}}"#)];
        let mut store = MemoryStore::new();
        import(repo(&files), &mut store, &SyncSettings::default()).await.unwrap();
        let report = import(repo(&files), &mut store, &SyncSettings::default()).await.unwrap();
        assert_eq!(report.variables_created, 0);
        assert_eq!(report.variables_updated, 2);
    }

    #[tokio::test]
    async fn test_kind_mismatch_is_skipped() {
        let mut store = MemoryStore::new();
        import(
            repo(&[("tokens/base.json", r#"{"a": {"value": 1}}"#)]),
            &mut store,
            &SyncSettings::default(),
        )
        .await
        .unwrap();
        let report = import(
            repo(&[("tokens/base.json", r#"{"a": {"value": "Inter"}}"#)]),
            &mut store,
            &SyncSettings::default(),
        )
        .await
        .unwrap();
        assert_eq!(report.warnings[0].kind, DiagnosticKind::KindMismatch);
        assert_eq!(report.variables_updated, 0);
    }
}
