//! End-to-end round trips through a local token repository
//!
//! import -> edit the store -> export -> export again

use std::sync::Arc;

use pretty_assertions::assert_eq;
use tokens_core::{CanonicalValue, to_canonical_color};
use tokens_sync::{
    ExportOptions, LocalRepository, MemoryStore, SyncSettings, VariableStore, export, import,
};
use tokens_test_utils::repo::TokenRepo;

fn options(branch: &str) -> ExportOptions {
    ExportOptions {
        branch: Some(branch.to_string()),
        ..ExportOptions::default()
    }
}

fn set_color(store: &mut MemoryStore, variable: &str, mode: &str, hex: &str) {
    let collection = store.find_collection("Design Tokens").unwrap().unwrap();
    let mode = store
        .modes(collection)
        .unwrap()
        .into_iter()
        .find(|m| m.name == mode)
        .unwrap();
    let variable = store
        .variables(collection)
        .unwrap()
        .into_iter()
        .find(|v| v.name == variable)
        .unwrap();
    let value = CanonicalValue::Color(to_canonical_color(hex).unwrap());
    store.set_value(variable.id, mode.id, value).unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_import_edit_export_cycle() {
    let fixture = TokenRepo::multi_brand();
    let settings = SyncSettings::default();
    let repo = Arc::new(LocalRepository::new(fixture.root()));
    let mut store = MemoryStore::new();

    let report = import(repo.clone(), &mut store, &settings).await.unwrap();
    assert!(report.success);
    assert_eq!(report.modes, vec!["Default", "acme", "globex"]);
    assert_eq!(report.errors, vec![]);
    // globex file needed trailing comma recovery
    assert_eq!(report.warnings.len(), 1);

    let first = export(&store, repo.as_ref(), &settings, &options("tokens/update-1"))
        .await
        .unwrap();
    assert_eq!(first.files.len(), 3);
    assert_eq!(first.pull_request.as_ref().unwrap().number, 1);

    let base = fixture.read_json("tokens/tokens.json");
    assert_eq!(base["color"]["primary"]["value"], "#000000");
    assert_eq!(base["spacing"]["sm"]["value"], 4);
    assert_eq!(base["spacing"]["sm"]["type"], "number");
    assert_eq!(base["font"]["uppercase"]["value"], false);

    let globex = fixture.read_json("tokens/brands/globex/tokens.json");
    assert_eq!(
        globex,
        serde_json::json!({"color": {"primary": {"value": "#0044ff", "type": "color", "comment": "Brand primary"}}})
    );

    // Nothing changed since the last export
    let unchanged = export(&store, repo.as_ref(), &settings, &options("tokens/update-2"))
        .await
        .unwrap();
    assert!(!unchanged.has_changes());
    assert_eq!(unchanged.pull_request, None);

    set_color(&mut store, "color/base/black", "acme", "#220000");
    let edited = export(&store, repo.as_ref(), &settings, &options("tokens/update-3"))
        .await
        .unwrap();
    assert_eq!(edited.files.len(), 1);
    assert_eq!(edited.files[0].path, "tokens/brands/acme/tokens.json");
    assert_eq!(edited.files[0].changes.modified, vec!["color.base.black"]);
    assert_eq!(
        edited.pull_request.unwrap().title,
        "Update design tokens (+0 ~1 -0)"
    );
    fixture.assert_file_contains(
        ".tokens/pull-requests/tokens-update-3.md",
        "`color.base.black`",
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_store_file_survives_between_runs() {
    let fixture = TokenRepo::multi_brand();
    let settings = SyncSettings::default();
    let repo = Arc::new(LocalRepository::new(fixture.root()));
    let store_path = fixture.path("store.json");

    let mut store = MemoryStore::load(&store_path).unwrap();
    import(repo.clone(), &mut store, &settings).await.unwrap();
    store.save(&store_path).unwrap();

    let reloaded = MemoryStore::load(&store_path).unwrap();
    assert_eq!(reloaded, store);

    let dry = ExportOptions {
        dry_run: true,
        ..ExportOptions::default()
    };
    let report = export(&reloaded, repo.as_ref(), &settings, &dry).await.unwrap();
    assert!(report.dry_run);
    assert_eq!(report.files.len(), 3);
    fixture.assert_file_not_exists("tokens/tokens.json");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_custom_layout_settings() {
    let fixture = TokenRepo::new();
    fixture.write("design/core.json", r##"{"bg": {"value": "#ffffff"}}"##);
    fixture.write("design/themes/dark/bg.json", r##"{"bg": {"value": "#000000"}}"##);
    fixture.write("design/drafts/wip.json", r##"{"oops": "#"##);
    fixture.write_settings(
        r#"
        collection = "Themes"
        file_patterns = ["design/**/*.json"]
        exclude_patterns = ["design/drafts/**"]

        [export]
        path = "design/out/core.json"
        brand_path = "design/out/{brand}.json"
        "#,
    );
    let settings = SyncSettings::load(&fixture.path("tokens.toml")).unwrap();
    let repo = Arc::new(LocalRepository::new(fixture.root()));
    let mut store = MemoryStore::new();

    let report = import(repo.clone(), &mut store, &settings).await.unwrap();
    assert_eq!(report.files_processed, 2);
    assert_eq!(report.modes, vec!["Default", "dark"]);
    assert!(store.find_collection("Themes").unwrap().is_some());

    export(&store, repo.as_ref(), &settings, &options("themes-1"))
        .await
        .unwrap();
    assert_eq!(
        fixture.read_json("design/out/dark.json"),
        serde_json::json!({"bg": {"value": "#000000", "type": "color"}})
    );
}
