//! Token tree model
//!
//! A token tree is a tagged union: every node is either a [`Leaf`] holding a
//! scalar value, or a group mapping names to child nodes. Group keys keep
//! their insertion order so that flattening and diffing follow the order in
//! which tokens were authored.
//!
//! The JSON boundary ([`TokenNode::from_json`]) is the only place where the
//! "is this object a token or a group?" question is asked. A JSON object is a
//! leaf when it carries a `value` (or `$value`) key, otherwise it is a group.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Outcome};

const VALUE_KEYS: &[&str] = &["value", "$value"];
const TYPE_KEYS: &[&str] = &["type", "$type"];
const COMMENT_KEYS: &[&str] = &["comment", "description", "$description"];

/// Children of a group, in authoring order
pub type Group = IndexMap<String, TokenNode>;

/// A primitive token value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to a JSON value, writing integral numbers without a fraction
    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Boolean(b) => Value::Bool(*b),
            Scalar::Text(s) => Value::String(s.clone()),
            Scalar::Number(n) => number_to_json(*n),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Boolean(b) => write!(f, "{}", b),
            Scalar::Text(s) => f.write_str(s),
            Scalar::Number(n) => write!(f, "{}", number_to_json(*n)),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Boolean(b)
    }
}

fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// A token: a value plus optional declared type and comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    pub value: Scalar,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Leaf {
    pub fn new(value: impl Into<Scalar>) -> Self {
        Self {
            value: value.into(),
            token_type: None,
            comment: None,
        }
    }

    pub fn with_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = Some(token_type.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("value".to_string(), self.value.to_json());
        if let Some(t) = &self.token_type {
            map.insert("type".to_string(), Value::String(t.clone()));
        }
        if let Some(c) = &self.comment {
            map.insert("comment".to_string(), Value::String(c.clone()));
        }
        Value::Object(map)
    }
}

/// A node of a token tree
#[derive(Debug, Clone, PartialEq)]
pub enum TokenNode {
    Leaf(Leaf),
    Group(Group),
}

impl Default for TokenNode {
    fn default() -> Self {
        Self::group()
    }
}

impl From<Leaf> for TokenNode {
    fn from(leaf: Leaf) -> Self {
        TokenNode::Leaf(leaf)
    }
}

impl TokenNode {
    /// An empty group
    pub fn group() -> Self {
        TokenNode::Group(Group::new())
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TokenNode::Leaf(_))
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            TokenNode::Leaf(leaf) => Some(leaf),
            TokenNode::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            TokenNode::Group(group) => Some(group),
            TokenNode::Leaf(_) => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            TokenNode::Group(group) => Some(group),
            TokenNode::Leaf(_) => None,
        }
    }

    /// True for a group with no children
    pub fn is_empty(&self) -> bool {
        matches!(self, TokenNode::Group(g) if g.is_empty())
    }

    /// Direct child lookup
    pub fn get(&self, key: &str) -> Option<&TokenNode> {
        self.as_group().and_then(|g| g.get(key))
    }

    /// Descend through groups segment by segment
    pub fn get_path<S: AsRef<str>>(&self, segments: &[S]) -> Option<&TokenNode> {
        segments
            .iter()
            .try_fold(self, |node, segment| node.get(segment.as_ref()))
    }

    /// Number of leaves in the tree
    pub fn leaf_count(&self) -> usize {
        match self {
            TokenNode::Leaf(_) => 1,
            TokenNode::Group(group) => group.values().map(TokenNode::leaf_count).sum(),
        }
    }

    /// Serialize back to the JSON file layout (`value`/`type`/`comment`)
    pub fn to_json(&self) -> Value {
        match self {
            TokenNode::Leaf(leaf) => leaf.to_json(),
            TokenNode::Group(group) => Value::Object(
                group
                    .iter()
                    .map(|(key, child)| (key.clone(), child.to_json()))
                    .collect(),
            ),
        }
    }

    /// Build a token tree from parsed JSON.
    ///
    /// Recognizes both the plain (`value`, `type`, `comment`) and the W3C
    /// design-token (`$value`, `$type`, `$description`) spellings. A group's
    /// `$type` is inherited by descendant leaves that declare no type of their
    /// own. Anything that is neither a token nor a group is skipped with a
    /// warning.
    pub fn from_json(value: &Value) -> Outcome<TokenNode> {
        let mut diagnostics = Diagnostics::new();
        let node = match value {
            Value::Object(map) => {
                let mut path = Vec::new();
                convert_object(map, &mut path, None, &mut diagnostics)
                    .unwrap_or_else(TokenNode::group)
            }
            other => {
                diagnostics.push(Diagnostic::warning(
                    DiagnosticKind::Parse,
                    format!("expected a JSON object at the root, found {}", json_kind(other)),
                ));
                TokenNode::group()
            }
        };
        Outcome::new(node, diagnostics)
    }
}

fn convert_object(
    map: &Map<String, Value>,
    path: &mut Vec<String>,
    inherited_type: Option<&str>,
    diagnostics: &mut Diagnostics,
) -> Option<TokenNode> {
    if let Some(raw) = first_of(map, VALUE_KEYS) {
        return convert_leaf(map, raw, path, inherited_type, diagnostics).map(TokenNode::Leaf);
    }

    let group_type = map.get("$type").and_then(Value::as_str).or(inherited_type);
    let mut group = Group::new();

    for (key, child) in map {
        if key.starts_with('$') {
            continue;
        }
        path.push(key.clone());
        match child {
            Value::Object(child_map) => {
                if let Some(node) = convert_object(child_map, path, group_type, diagnostics) {
                    group.insert(key.clone(), node);
                }
            }
            other => {
                diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticKind::StructuralAmbiguity,
                        format!("skipping {} that is neither a token nor a group", json_kind(other)),
                    )
                    .at(path.join(".")),
                );
            }
        }
        path.pop();
    }

    Some(TokenNode::Group(group))
}

fn convert_leaf(
    map: &Map<String, Value>,
    raw: &Value,
    path: &[String],
    inherited_type: Option<&str>,
    diagnostics: &mut Diagnostics,
) -> Option<Leaf> {
    let dotted = path.join(".");

    let nested: Vec<&String> = map
        .iter()
        .filter(|(k, v)| v.is_object() && !is_leaf_attribute(k))
        .map(|(k, _)| k)
        .collect();
    if !nested.is_empty() {
        diagnostics.push(
            Diagnostic::warning(
                DiagnosticKind::StructuralAmbiguity,
                format!(
                    "token carries a value and nested groups ({}); nested groups ignored",
                    nested
                        .iter()
                        .map(|k| k.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            )
            .at(dotted.clone()),
        );
    }

    let value = match raw {
        Value::String(s) => Scalar::Text(s.clone()),
        Value::Bool(b) => Scalar::Boolean(*b),
        Value::Number(n) => Scalar::Number(n.as_f64().unwrap_or_default()),
        Value::Null => {
            diagnostics.push(
                Diagnostic::warning(DiagnosticKind::Parse, "token value is null; skipped")
                    .at(dotted),
            );
            return None;
        }
        composite @ (Value::Array(_) | Value::Object(_)) => {
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticKind::Parse,
                    "composite token value stored as JSON text",
                )
                .at(dotted),
            );
            Scalar::Text(composite.to_string())
        }
    };

    let token_type = first_of(map, TYPE_KEYS)
        .and_then(Value::as_str)
        .or(inherited_type)
        .map(str::to_string);
    let comment = first_of(map, COMMENT_KEYS)
        .and_then(Value::as_str)
        .map(str::to_string);

    Some(Leaf {
        value,
        token_type,
        comment,
    })
}

fn first_of<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| map.get(*k))
}

fn is_leaf_attribute(key: &str) -> bool {
    key.starts_with('$')
        || VALUE_KEYS.contains(&key)
        || TYPE_KEYS.contains(&key)
        || COMMENT_KEYS.contains(&key)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
