//! Path codec: nested token trees to flat token records and back
//!
//! Paths are lists of group names from the root to the leaf. Two string
//! spellings are in use: dotted (`color.base.blue`) as written in alias
//! references and change summaries, and slashed (`color/base/blue`) as used
//! for variable names in the host store.
//!
//! # Examples
//!
//! ```
//! use tokens_core::node::TokenNode;
//! use tokens_core::path::{flatten, unflatten_all};
//! use serde_json::json;
//!
//! let tree = TokenNode::from_json(&json!({
//!     "color": {"base": {"blue": {"value": "#2196f3"}}}
//! })).value;
//!
//! let flat = flatten(&tree);
//! assert_eq!(flat[0].dot_path(), "color.base.blue");
//! assert_eq!(flat[0].slash_path(), "color/base/blue");
//!
//! let rebuilt = unflatten_all(flat).unwrap().value;
//! assert_eq!(rebuilt, tree);
//! ```

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Outcome};
use crate::error::{Error, Result};
use crate::node::{Group, Leaf, Scalar, TokenNode};

/// One leaf of a token tree together with its full path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatToken {
    pub path: Vec<String>,
    pub value: Scalar,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl FlatToken {
    pub fn new(path: Vec<String>, leaf: Leaf) -> Self {
        Self {
            path,
            value: leaf.value,
            token_type: leaf.token_type,
            comment: leaf.comment,
        }
    }

    /// `color.base.blue`
    pub fn dot_path(&self) -> String {
        self.path.join(".")
    }

    /// `color/base/blue`
    pub fn slash_path(&self) -> String {
        self.path.join("/")
    }

    pub fn into_leaf(self) -> (Vec<String>, Leaf) {
        (
            self.path,
            Leaf {
                value: self.value,
                token_type: self.token_type,
                comment: self.comment,
            },
        )
    }
}

/// Split a slashed host variable name back into path segments
pub fn split_variable_name(name: &str) -> Vec<String> {
    name.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a dotted reference path into segments
pub fn split_dotted(path: &str) -> Vec<String> {
    path.split('.')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Flatten a tree depth-first, in key insertion order.
///
/// A bare leaf at the root has no path and yields nothing.
pub fn flatten(tree: &TokenNode) -> Vec<FlatToken> {
    let mut out = Vec::new();
    if let TokenNode::Group(group) = tree {
        let mut prefix = Vec::new();
        flatten_group(group, &mut prefix, &mut out);
    }
    out
}

fn flatten_group(group: &Group, prefix: &mut Vec<String>, out: &mut Vec<FlatToken>) {
    for (key, child) in group {
        prefix.push(key.clone());
        match child {
            TokenNode::Leaf(leaf) => out.push(FlatToken::new(prefix.clone(), leaf.clone())),
            TokenNode::Group(inner) => flatten_group(inner, prefix, out),
        }
        prefix.pop();
    }
}

/// Place `leaf` at `path` inside `into`, creating groups along the way.
///
/// An existing leaf at the final segment is overwritten. A leaf found where a
/// group is needed (or a non-group root) is replaced by a group and reported
/// as an [`DiagnosticKind::UnflattenConflict`] warning.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] when `path` is empty.
pub fn unflatten<S: AsRef<str>>(path: &[S], leaf: Leaf, into: &mut TokenNode) -> Result<Diagnostics> {
    let Some((last, parents)) = path.split_last() else {
        return Err(Error::InvalidArgument(
            "cannot unflatten a token with an empty path".to_string(),
        ));
    };

    let mut diagnostics = Diagnostics::new();
    let mut node = into;
    let mut walked: Vec<&str> = Vec::with_capacity(path.len());

    for segment in parents {
        let segment = segment.as_ref();
        if node.is_leaf() {
            diagnostics.push(conflict(&walked, "leaf replaced by a group"));
            *node = TokenNode::group();
        }
        walked.push(segment);
        let group = match node {
            TokenNode::Group(group) => group,
            TokenNode::Leaf(_) => unreachable!("leaf replaced above"),
        };
        node = group
            .entry(segment.to_string())
            .or_insert_with(TokenNode::group);
    }

    if node.is_leaf() {
        diagnostics.push(conflict(&walked, "leaf replaced by a group"));
        *node = TokenNode::group();
    }
    walked.push(last.as_ref());
    if let TokenNode::Group(group) = node {
        if let Some(TokenNode::Group(existing)) = group.get(last.as_ref())
            && !existing.is_empty()
        {
            diagnostics.push(conflict(&walked, "group replaced by a token"));
        }
        group.insert(last.as_ref().to_string(), TokenNode::Leaf(leaf));
    }

    Ok(diagnostics)
}

/// Rebuild a tree from flat tokens, in the order given
pub fn unflatten_all(tokens: impl IntoIterator<Item = FlatToken>) -> Result<Outcome<TokenNode>> {
    let mut tree = TokenNode::group();
    let mut diagnostics = Diagnostics::new();
    for token in tokens {
        let (path, leaf) = token.into_leaf();
        diagnostics.extend(unflatten(&path, leaf, &mut tree)?);
    }
    Ok(Outcome::new(tree, diagnostics))
}

fn conflict(walked: &[&str], what: &str) -> Diagnostic {
    let at = if walked.is_empty() {
        "<root>".to_string()
    } else {
        walked.join(".")
    };
    Diagnostic::warning(DiagnosticKind::UnflattenConflict, what).at(at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn tree(value: serde_json::Value) -> TokenNode {
        TokenNode::from_json(&value).value
    }

    #[test]
    fn test_flatten_empty_tree() {
        assert!(flatten(&TokenNode::group()).is_empty());
    }

    #[test]
    fn test_flatten_follows_insertion_order() {
        let t = tree(json!({
            "b": {"x": {"value": 1}},
            "a": {"y": {"value": 2}, "x": {"value": 3}}
        }));
        let paths: Vec<String> = flatten(&t).iter().map(FlatToken::dot_path).collect();
        assert_eq!(paths, vec!["b.x", "a.y", "a.x"]);
    }

    #[test]
    fn test_unflatten_creates_intermediate_groups() {
        let mut t = TokenNode::group();
        let diags = unflatten(&["a", "b", "c"], Leaf::new(1.0), &mut t).unwrap();
        assert!(diags.is_empty());
        assert_eq!(t, tree(json!({"a": {"b": {"c": {"value": 1}}}})));
    }

    #[test]
    fn test_unflatten_overwrites_existing_leaf() {
        let mut t = tree(json!({"a": {"b": {"value": 1}}}));
        let diags = unflatten(&["a", "b"], Leaf::new(2.0), &mut t).unwrap();
        assert!(diags.is_empty());
        assert_eq!(t, tree(json!({"a": {"b": {"value": 2}}})));
    }

    #[test]
    fn test_unflatten_into_existing_groups_keeps_siblings() {
        let mut t = tree(json!({"a": {"x": {"value": 1}}}));
        unflatten(&["a", "y"], Leaf::new(2.0), &mut t).unwrap();
        assert_eq!(t, tree(json!({"a": {"x": {"value": 1}, "y": {"value": 2}}})));
    }

    #[test]
    fn test_unflatten_leaf_in_the_way_is_a_warning() {
        let mut t = tree(json!({"a": {"value": 1}}));
        let diags = unflatten(&["a", "b"], Leaf::new(2.0), &mut t).unwrap();
        assert_eq!(diags.count_kind(DiagnosticKind::UnflattenConflict), 1);
        assert_eq!(t, tree(json!({"a": {"b": {"value": 2}}})));
    }

    #[test]
    fn test_unflatten_empty_path_fails_fast() {
        let mut t = TokenNode::group();
        let empty: [&str; 0] = [];
        assert!(matches!(
            unflatten(&empty, Leaf::new(1.0), &mut t),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_round_trip() {
        let t = tree(json!({
            "color": {
                "base": {"blue": {"500": {"value": "#2196f3", "type": "color"}}},
                "text": {"value": "#000", "comment": "body copy"}
            },
            "flag": {"value": true}
        }));
        let rebuilt = unflatten_all(flatten(&t)).unwrap();
        assert!(rebuilt.diagnostics.is_empty());
        assert_eq!(rebuilt.value, t);
    }

    #[test]
    fn test_variable_name_helpers() {
        assert_eq!(split_variable_name("color/base/blue"), vec!["color", "base", "blue"]);
        assert_eq!(split_dotted("color.base"), vec!["color", "base"]);
    }
}
