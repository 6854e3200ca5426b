//! Primitive kinds and type inference
//!
//! Host stores know four primitive kinds. Tokens arrive with free-form
//! declared types (`colorHex`, `fontSize`, `spacing`, ...) or none at all;
//! [`TokenKind::infer`] maps both cases onto one of the four.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::node::Scalar;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap());

static FUNCTIONAL_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(rgba?|hsla?)\s*\(.*\)$").unwrap());

static DIMENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^-?(\d+\.?\d*|\.\d+)\s*(px|rem|em|pt|%)$").unwrap());

/// Declared type names, normalized (lowercase, no `-`/`_`), per kind
const COLOR_TYPES: &[&str] = &["color", "colorrgb", "colorhex", "colorrgba"];
const NUMBER_TYPES: &[&str] = &[
    "dimension",
    "size",
    "sizing",
    "spacing",
    "fontsize",
    "fontweight",
    "lineheight",
    "letterspacing",
    "paragraphspacing",
    "borderradius",
    "borderwidth",
    "opacity",
    "number",
    "float",
];
const BOOLEAN_TYPES: &[&str] = &["boolean", "bool"];
const TEXT_TYPES: &[&str] = &[
    "string",
    "text",
    "fontfamily",
    "fontfamilies",
    "fontstyle",
    "textcase",
    "textdecoration",
];

/// The four primitive kinds a host store can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Color,
    Number,
    Text,
    Boolean,
}

impl TokenKind {
    /// Match a declared type against the synonym table, case-insensitively
    pub fn from_declared(declared: &str) -> Option<Self> {
        let normalized: String = declared
            .chars()
            .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        let n = normalized.as_str();

        if COLOR_TYPES.contains(&n) {
            Some(Self::Color)
        } else if NUMBER_TYPES.contains(&n) {
            Some(Self::Number)
        } else if BOOLEAN_TYPES.contains(&n) {
            Some(Self::Boolean)
        } else if TEXT_TYPES.contains(&n) {
            Some(Self::Text)
        } else {
            None
        }
    }

    /// Infer the kind from the shape of a raw value
    pub fn from_value(value: &Scalar) -> Self {
        match value {
            Scalar::Boolean(_) => Self::Boolean,
            Scalar::Number(_) => Self::Number,
            Scalar::Text(text) => {
                let text = text.trim();
                if is_color_literal(text) {
                    Self::Color
                } else if DIMENSION.is_match(text) {
                    Self::Number
                } else {
                    Self::Text
                }
            }
        }
    }

    /// Declared type first, value shape as the fallback
    pub fn infer(declared: Option<&str>, value: &Scalar) -> Self {
        declared
            .and_then(Self::from_declared)
            .unwrap_or_else(|| Self::from_value(value))
    }

    /// Type name written back into token files
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Number => "number",
            Self::Text => "string",
            Self::Boolean => "boolean",
        }
    }
}

/// `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()`, `rgba()`, `hsl()` or `hsla()`
pub fn is_color_literal(text: &str) -> bool {
    HEX_COLOR.is_match(text) || FUNCTIONAL_COLOR.is_match(text)
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color => write!(f, "color"),
            Self::Number => write!(f, "number"),
            Self::Text => write!(f, "text"),
            Self::Boolean => write!(f, "boolean"),
        }
    }
}

impl FromStr for TokenKind {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_declared(s)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown token kind: {}", s)))
    }
}
