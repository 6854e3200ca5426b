//! Alias reference resolution
//!
//! A token whose whole value is `{dotted.path}` is an alias for the token at
//! that path. Resolution replaces the alias with the target's value, following
//! chains of aliases until a concrete value is reached. Paths are always looked
//! up against the root of the fully merged tree.
//!
//! Dangling aliases are kept verbatim with a warning. Alias chains that loop
//! back on themselves are cut: each token on the loop keeps its original text
//! and gets a [`CyclicReference`](crate::DiagnosticKind::CyclicReference) error.

use std::sync::LazyLock;

use regex::Regex;

use crate::diagnostics::{Diagnostics, Outcome};
use crate::error::Error;
use crate::node::{Group, Scalar, TokenNode};

static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{\s*([^{}\s]+)\s*\}$").unwrap());

/// The dotted path of a full-string alias, if `text` is one
pub fn parse_reference(text: &str) -> Option<&str> {
    REFERENCE
        .captures(text.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Look up a dotted path in `root`, descending through groups
pub fn lookup<'a>(root: &'a TokenNode, dotted: &str) -> Option<&'a TokenNode> {
    dotted
        .split('.')
        .try_fold(root, |node, segment| node.get(segment))
}

/// Resolve every alias inside `node` against `root`.
///
/// Pass the same tree as both arguments to resolve a whole tree.
pub fn resolve(node: &TokenNode, root: &TokenNode) -> Outcome<TokenNode> {
    let mut diagnostics = Diagnostics::new();
    let mut path = Vec::new();
    let resolved = resolve_node(node, root, &mut path, &mut diagnostics);
    tracing::debug!(
        warnings = diagnostics.len(),
        "resolved references"
    );
    Outcome::new(resolved, diagnostics)
}

fn resolve_node(
    node: &TokenNode,
    root: &TokenNode,
    path: &mut Vec<String>,
    diagnostics: &mut Diagnostics,
) -> TokenNode {
    match node {
        TokenNode::Group(group) => {
            let mut out = Group::with_capacity(group.len());
            for (key, child) in group {
                path.push(key.clone());
                out.insert(key.clone(), resolve_node(child, root, path, diagnostics));
                path.pop();
            }
            TokenNode::Group(out)
        }
        TokenNode::Leaf(leaf) => {
            let mut leaf = leaf.clone();
            if let Scalar::Text(text) = &leaf.value
                && let Some(reference) = parse_reference(text)
            {
                let at = path.join(".");
                let mut chain = Vec::new();
                match resolve_reference(reference, root, &mut chain, &at, diagnostics) {
                    Ok(value) => leaf.value = value,
                    Err(chain) => diagnostics.push(Error::CyclicReference { chain }.to_error().at(at)),
                }
            }
            TokenNode::Leaf(leaf)
        }
    }
}

/// Follow `reference` to a concrete value.
///
/// Returns the visited chain (closed by the repeated path) on a cycle.
fn resolve_reference(
    reference: &str,
    root: &TokenNode,
    chain: &mut Vec<String>,
    at: &str,
    diagnostics: &mut Diagnostics,
) -> Result<Scalar, Vec<String>> {
    if chain.iter().any(|seen| seen == reference) {
        let mut cycle = chain.clone();
        cycle.push(reference.to_string());
        return Err(cycle);
    }

    let Some(TokenNode::Leaf(target)) = lookup(root, reference) else {
        diagnostics.push(
            Error::UnresolvedReference {
                reference: reference.to_string(),
            }
            .to_warning()
            .at(at),
        );
        return Ok(Scalar::Text(format!("{{{}}}", reference)));
    };

    match target.value.as_text().and_then(parse_reference) {
        Some(next) => {
            chain.push(reference.to_string());
            let resolved = resolve_reference(next, root, chain, at, diagnostics);
            chain.pop();
            resolved
        }
        None => Ok(target.value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn tree(value: serde_json::Value) -> TokenNode {
        TokenNode::from_json(&value).value
    }

    fn value_at(t: &TokenNode, dotted: &str) -> Scalar {
        lookup(t, dotted)
            .and_then(TokenNode::as_leaf)
            .map(|l| l.value.clone())
            .unwrap()
    }

    #[test]
    fn test_parse_reference() {
        assert_eq!(parse_reference("{color.base.red}"), Some("color.base.red"));
        assert_eq!(parse_reference(" { a.b } "), Some("a.b"));
        assert_eq!(parse_reference("1px solid {color.red}"), None);
        assert_eq!(parse_reference("#ff0000"), None);
    }

    #[test]
    fn test_simple_alias() {
        let t = tree(json!({
            "color": {
                "base": {"red": {"value": "#ff0000"}},
                "semantic": {"error": {"value": "{color.base.red}"}}
            }
        }));
        let outcome = resolve(&t, &t);
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(value_at(&outcome.value, "color.semantic.error"), Scalar::Text("#ff0000".into()));
    }

    #[test]
    fn test_transitive_alias() {
        let t = tree(json!({
            "a": {"value": "{b}"},
            "b": {"value": "{c}"},
            "c": {"value": 12}
        }));
        let outcome = resolve(&t, &t);
        assert_eq!(value_at(&outcome.value, "a"), Scalar::Number(12.0));
        assert_eq!(value_at(&outcome.value, "b"), Scalar::Number(12.0));
    }

    #[test]
    fn test_missing_reference_kept_verbatim() {
        let t = tree(json!({"a": {"value": "{does.not.exist}"}}));
        let outcome = resolve(&t, &t);
        assert_eq!(value_at(&outcome.value, "a"), Scalar::Text("{does.not.exist}".into()));
        assert_eq!(
            outcome.diagnostics.count_kind(DiagnosticKind::UnresolvedReference),
            1
        );
        assert!(!outcome.diagnostics.has_errors());
        let warning = outcome.diagnostics.iter().next().unwrap();
        assert_eq!(warning.message, "Unresolved reference: {does.not.exist}");
        assert_eq!(warning.path.as_deref(), Some("a"));
    }

    #[test]
    fn test_reference_to_group_is_unresolved() {
        let t = tree(json!({"g": {"x": {"value": 1}}, "a": {"value": "{g}"}}));
        let outcome = resolve(&t, &t);
        assert_eq!(value_at(&outcome.value, "a"), Scalar::Text("{g}".into()));
    }

    #[test]
    fn test_cycle_is_an_error_per_token() {
        let t = tree(json!({
            "a": {"value": "{b}"},
            "b": {"value": "{a}"},
            "ok": {"value": "#fff"}
        }));
        let outcome = resolve(&t, &t);
        assert_eq!(value_at(&outcome.value, "a"), Scalar::Text("{b}".into()));
        assert_eq!(value_at(&outcome.value, "b"), Scalar::Text("{a}".into()));
        assert_eq!(value_at(&outcome.value, "ok"), Scalar::Text("#fff".into()));
        assert_eq!(outcome.diagnostics.count_kind(DiagnosticKind::CyclicReference), 2);
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let t = tree(json!({"a": {"value": "{a}"}}));
        let outcome = resolve(&t, &t);
        assert!(outcome.diagnostics.has_errors());
        let error = outcome.diagnostics.errors().next().unwrap();
        assert_eq!(error.message, "Cyclic reference: a -> a");
    }

    #[test]
    fn test_resolve_preserves_type_and_comment() {
        let t = tree(json!({
            "base": {"value": "4px"},
            "gap": {"value": "{base}", "type": "spacing", "comment": "grid gap"}
        }));
        let resolved = resolve(&t, &t).value;
        let gap = lookup(&resolved, "gap").and_then(TokenNode::as_leaf).unwrap();
        assert_eq!(gap.value, Scalar::Text("4px".into()));
        assert_eq!(gap.token_type.as_deref(), Some("spacing"));
        assert_eq!(gap.comment.as_deref(), Some("grid gap"));
    }
}
