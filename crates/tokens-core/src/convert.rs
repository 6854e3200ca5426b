//! Conversion between token values and host-store canonical values
//!
//! Colors become RGBA with every channel in `[0, 1]`, numbers become plain
//! floats (any unit suffix is dropped, so the number conversion is lossy by
//! nature), text and booleans pass through.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, DiagnosticKind, Outcome};
use crate::error::{Error, Result};
use crate::kind::TokenKind;
use crate::node::Scalar;

static RGB_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*(\d*\.?\d+)\s*)?\)$",
    )
    .unwrap()
});

static HSL_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^hsla?\(\s*(-?\d*\.?\d+)(?:deg)?\s*,\s*(\d*\.?\d+)%\s*,\s*(\d*\.?\d+)%\s*(?:,\s*(\d*\.?\d+)\s*)?\)$",
    )
    .unwrap()
});

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([-+]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][-+]?\d+)?)").unwrap());

/// A color with every channel in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    fn from_bytes(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            f64::from(a) / 255.0,
        )
    }
}

/// A value ready to be handed to the host store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum CanonicalValue {
    Color(Rgba),
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl CanonicalValue {
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::Color(_) => TokenKind::Color,
            Self::Number(_) => TokenKind::Number,
            Self::Text(_) => TokenKind::Text,
            Self::Boolean(_) => TokenKind::Boolean,
        }
    }

    /// Back to a token value; colors become hex strings
    pub fn to_scalar(&self) -> Scalar {
        match self {
            Self::Color(rgba) => Scalar::Text(from_canonical_color(rgba)),
            Self::Number(n) => Scalar::Number(*n),
            Self::Text(s) => Scalar::Text(s.clone()),
            Self::Boolean(b) => Scalar::Boolean(*b),
        }
    }
}

/// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()`/`rgba()` or `hsl()`/`hsla()`.
///
/// # Errors
///
/// Returns [`Error::InvalidColor`] when the text matches none of the grammars
/// or a channel is out of range.
pub fn to_canonical_color(text: &str) -> Result<Rgba> {
    let trimmed = text.trim();
    if let Some(hex) = trimmed.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| Error::invalid_color(text));
    }
    if let Some(caps) = RGB_FUNCTION.captures(trimmed) {
        let channel = |i: usize| -> Option<u8> { caps.get(i)?.as_str().parse::<u8>().ok() };
        let (Some(r), Some(g), Some(b)) = (channel(1), channel(2), channel(3)) else {
            return Err(Error::invalid_color(text));
        };
        let a = parse_alpha(caps.get(4).map(|m| m.as_str())).ok_or_else(|| Error::invalid_color(text))?;
        let mut rgba = Rgba::from_bytes(r, g, b, 255);
        rgba.a = a;
        return Ok(rgba);
    }
    if let Some(caps) = HSL_FUNCTION.captures(trimmed) {
        let num = |i: usize| -> Option<f64> { caps.get(i)?.as_str().parse::<f64>().ok() };
        let (Some(h), Some(s), Some(l)) = (num(1), num(2), num(3)) else {
            return Err(Error::invalid_color(text));
        };
        if s > 100.0 || l > 100.0 {
            return Err(Error::invalid_color(text));
        }
        let a = parse_alpha(caps.get(4).map(|m| m.as_str())).ok_or_else(|| Error::invalid_color(text))?;
        let (r, g, b) = hsl_to_rgb(h, s / 100.0, l / 100.0);
        return Ok(Rgba::new(r, g, b, a));
    }
    Err(Error::invalid_color(text))
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
    match hex.len() {
        3 => Some(Rgba::from_bytes(nibble(0)?, nibble(1)?, nibble(2)?, 255)),
        6 => Some(Rgba::from_bytes(byte(0)?, byte(2)?, byte(4)?, 255)),
        8 => Some(Rgba::from_bytes(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn parse_alpha(raw: Option<&str>) -> Option<f64> {
    match raw {
        None => Some(1.0),
        Some(s) => s.parse::<f64>().ok().filter(|a| (0.0..=1.0).contains(a)),
    }
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let h = h.rem_euclid(360.0) / 360.0;
    if s == 0.0 {
        return (l, l, l);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let hue = |mut t: f64| {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };
    (hue(h + 1.0 / 3.0), hue(h), hue(h - 1.0 / 3.0))
}

/// Render a color as `#rrggbb`, or `#rrggbbaa` when not fully opaque
pub fn from_canonical_color(rgba: &Rgba) -> String {
    let byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    let (r, g, b, a) = (byte(rgba.r), byte(rgba.g), byte(rgba.b), byte(rgba.a));
    if a == 255 {
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
    }
}

/// Parse the leading numeric run of `text`, ignoring any unit suffix.
///
/// Never fails: text without a leading number yields `0` plus an
/// [`DiagnosticKind::InvalidNumber`] warning.
pub fn to_canonical_number(text: &str) -> Outcome<f64> {
    let parsed = LEADING_NUMBER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok());
    match parsed {
        Some(n) => Outcome::clean(n),
        None => Outcome::clean(0.0).with(Diagnostic::warning(
            DiagnosticKind::InvalidNumber,
            format!("no numeric value in {:?}; using 0", text),
        )),
    }
}

/// Convert a token value to the canonical form of `kind`.
///
/// # Errors
///
/// Returns [`Error::InvalidColor`], [`Error::InvalidNumber`] or
/// [`Error::InvalidBoolean`] when the value cannot take that kind.
pub fn to_canonical(kind: TokenKind, value: &Scalar) -> Result<Outcome<CanonicalValue>> {
    match (kind, value) {
        (TokenKind::Color, Scalar::Text(text)) => {
            Ok(Outcome::clean(CanonicalValue::Color(to_canonical_color(text)?)))
        }
        (TokenKind::Color, other) => Err(Error::invalid_color(other.to_string())),

        (TokenKind::Number, Scalar::Number(n)) if n.is_finite() => {
            Ok(Outcome::clean(CanonicalValue::Number(*n)))
        }
        (TokenKind::Number, Scalar::Text(text)) => {
            Ok(to_canonical_number(text).map(CanonicalValue::Number))
        }
        (TokenKind::Number, other) => Err(Error::InvalidNumber {
            value: other.to_string(),
        }),

        (TokenKind::Text, other) => Ok(Outcome::clean(CanonicalValue::Text(other.to_string()))),

        (TokenKind::Boolean, Scalar::Boolean(b)) => Ok(Outcome::clean(CanonicalValue::Boolean(*b))),
        (TokenKind::Boolean, Scalar::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Outcome::clean(CanonicalValue::Boolean(true))),
            "false" => Ok(Outcome::clean(CanonicalValue::Boolean(false))),
            _ => Err(Error::InvalidBoolean {
                value: text.clone(),
            }),
        },
        (TokenKind::Boolean, other) => Err(Error::InvalidBoolean {
            value: other.to_string(),
        }),
    }
}
