//! End-to-end engine scenarios: parse, classify, merge, resolve, flatten, convert, diff

use pretty_assertions::assert_eq;
use serde_json::json;
use tokens_core::{
    CanonicalValue, ChangeSet, FileCategory, ProcessedFile, Scalar, TokenKind, TokenNode, build_all,
    classify, diff, flatten, parse_token_file, resolve_tree, to_canonical,
};

fn tree(value: serde_json::Value) -> TokenNode {
    TokenNode::from_json(&value).value
}

#[test]
fn test_flatten_infer_and_convert_color() {
    let t = tree(json!({"color": {"base": {"blue": {"500": {"value": "#2196f3", "type": "color"}}}}}));
    let flat = flatten(&t);
    assert_eq!(flat.len(), 1);
    assert_eq!(flat[0].path, vec!["color", "base", "blue", "500"]);
    assert_eq!(flat[0].value, Scalar::Text("#2196f3".into()));

    let kind = TokenKind::infer(flat[0].token_type.as_deref(), &flat[0].value);
    assert_eq!(kind, TokenKind::Color);

    let CanonicalValue::Color(c) = to_canonical(kind, &flat[0].value).unwrap().value else {
        panic!("expected a color");
    };
    assert!((c.r - 0.129).abs() < 0.01);
    assert!((c.g - 0.588).abs() < 0.01);
    assert!((c.b - 0.953).abs() < 0.01);
    assert_eq!(c.a, 1.0);
}

#[test]
fn test_alias_resolution() {
    let t = tree(json!({
        "color": {
            "base": {"red": {"value": "#ff0000"}},
            "semantic": {"error": {"value": "{color.base.red}"}}
        }
    }));
    let resolved = resolve_tree(&t).value;
    let error = resolved
        .get_path(&["color", "semantic", "error"])
        .and_then(TokenNode::as_leaf)
        .unwrap();
    assert_eq!(error.value, Scalar::Text("#ff0000".into()));
}

#[test]
fn test_classify_base_and_two_brands() {
    let s = classify(
        &[
            "tokens/base.json",
            "tokens/brands/acme/colors.json",
            "tokens/brands/globex/colors.json",
        ],
        None,
    )
    .unwrap();
    assert_eq!(s.base_files, vec!["tokens/base.json"]);
    assert_eq!(s.brands.len(), 2);
    assert_eq!(s.brands[0].name, "acme");
    assert_eq!(s.brands[0].files, vec!["tokens/brands/acme/colors.json"]);
    assert_eq!(s.brands[1].name, "globex");
    assert_eq!(s.brands[1].files, vec!["tokens/brands/globex/colors.json"]);
}

#[test]
fn test_change_summary() {
    let old = tree(json!({"a": {"b": {"value": 1}, "d": {"value": 4}}}));
    let new = tree(json!({"a": {"b": {"value": 2}, "c": {"value": 3}}}));
    assert_eq!(
        diff(&old, &new),
        ChangeSet {
            added: vec!["a.c".to_string()],
            modified: vec!["a.b".to_string()],
            removed: vec!["a.d".to_string()],
        }
    );
}

#[test]
fn test_brand_aliases_resolve_against_merged_tree() {
    // The semantic alias lives in the foundation, the value it points to is
    // overridden per brand: each brand must see its own value.
    let files = [
        ("tokens/base.json", r##"{"color": {"brand": {"value": "#000000"}}}"##),
        (
            "tokens/global.json",
            r#"{"color": {"action": {"value": "{color.brand}", "type": "color"}}}"#,
        ),
        ("tokens/brands/acme/colors.json", r##"{"color": {"brand": {"value": "#ff0000"}},}"##),
    ];

    let paths: Vec<&str> = files.iter().map(|(p, _)| *p).collect();
    let structure = classify(&paths, None).unwrap();
    let processed: Vec<ProcessedFile> = files
        .iter()
        .map(|(path, text)| {
            let tokens = parse_token_file(path, text).unwrap().value;
            ProcessedFile::classified(*path, tokens, &structure)
        })
        .collect();
    assert_eq!(processed[1].category, FileCategory::Global);

    let trees = build_all(&structure, &processed);
    let action = |t: &TokenNode| {
        resolve_tree(t)
            .value
            .get_path(&["color", "action"])
            .and_then(TokenNode::as_leaf)
            .map(|l| l.value.clone())
            .unwrap()
    };
    assert_eq!(action(&trees.foundation), Scalar::Text("#000000".into()));
    assert_eq!(action(trees.brand("acme").unwrap()), Scalar::Text("#ff0000".into()));
}
