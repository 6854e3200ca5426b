//! Tolerant token file parsing
//!
//! Hand-edited token files often carry trailing commas, `//` or `/* */`
//! comments, or junk after the closing brace. Parsing tries the original
//! text first, then each recovery step in turn, every step starting again
//! from the original text:
//!
//! 1. strip trailing commas
//! 2. strip comments
//! 3. truncate after the first balanced top-level object
//!
//! The first attempt that yields valid JSON wins. A recovered parse is
//! reported as a warning naming the step that worked.

use serde_json::Value;

use crate::diagnostics::{Diagnostic, DiagnosticKind, Outcome};
use crate::error::{Error, Result};
use crate::node::TokenNode;

type Recovery = fn(&str) -> Option<String>;

const RECOVERY_STEPS: &[(&str, Recovery)] = &[
    ("trailing commas removed", recover_trailing_commas),
    ("comments removed", recover_comments),
    ("truncated after the top-level object", recover_truncated),
];

fn recover_trailing_commas(text: &str) -> Option<String> {
    Some(strip_trailing_commas(text))
}

fn recover_comments(text: &str) -> Option<String> {
    Some(strip_comments(text))
}

fn recover_truncated(text: &str) -> Option<String> {
    truncate_to_balanced(text).map(str::to_string)
}

/// Parse a token file into a tree, recovering from common syntax damage.
///
/// # Errors
///
/// Returns [`Error::Parse`] when no attempt yields a JSON object.
pub fn parse_token_file(path: &str, text: &str) -> Result<Outcome<TokenNode>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let (value, recovered_by) = match serde_json::from_str::<Value>(text) {
        Ok(value) => (value, None),
        Err(original) => {
            let recovered = RECOVERY_STEPS.iter().find_map(|(label, step)| {
                let candidate = step(text)?;
                serde_json::from_str::<Value>(&candidate)
                    .ok()
                    .map(|value| (value, *label))
            });
            match recovered {
                Some((value, label)) => (value, Some(label)),
                None => return Err(Error::parse(path, original.to_string())),
            }
        }
    };

    if !value.is_object() {
        return Err(Error::parse(path, "token file root must be a JSON object"));
    }

    let mut outcome = TokenNode::from_json(&value);
    if let Some(label) = recovered_by {
        tracing::debug!(path, step = label, "recovered malformed token file");
        outcome.diagnostics.push(
            Diagnostic::warning(DiagnosticKind::Parse, format!("recovered malformed JSON: {}", label))
                .at(path),
        );
    }
    Ok(outcome)
}

/// Remove commas that directly precede `}` or `]`, outside of strings
pub fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut scanner = StringScanner::default();

    for (i, &c) in chars.iter().enumerate() {
        if !scanner.in_string && c == ',' {
            let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        scanner.feed(c);
        out.push(c);
    }
    out
}

/// Remove `//` line comments and `/* */` block comments, outside of strings
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut scanner = StringScanner::default();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if !scanner.in_string && c == '/' {
            match chars.peek() {
                Some('/') => {
                    for skipped in chars.by_ref() {
                        if skipped == '\n' {
                            out.push('\n');
                            break;
                        }
                    }
                    continue;
                }
                Some('*') => {
                    chars.next();
                    let mut prev = '\0';
                    for skipped in chars.by_ref() {
                        if prev == '*' && skipped == '/' {
                            break;
                        }
                        prev = skipped;
                    }
                    continue;
                }
                _ => {}
            }
        }
        scanner.feed(c);
        out.push(c);
    }
    out
}

/// The text up to and including the brace closing the first top-level object
pub fn truncate_to_balanced(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut scanner = StringScanner::default();

    for (offset, c) in text[start..].char_indices() {
        let was_in_string = scanner.in_string;
        scanner.feed(c);
        if was_in_string {
            continue;
        }
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Tracks whether a character stream is inside a JSON string literal
#[derive(Default)]
struct StringScanner {
    in_string: bool,
    escaped: bool,
}

impl StringScanner {
    fn feed(&mut self, c: char) {
        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == '"' {
                self.in_string = false;
            }
        } else if c == '"' {
            self.in_string = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Scalar;
    use crate::resolve::lookup;

    fn value_at(t: &TokenNode, dotted: &str) -> Scalar {
        lookup(t, dotted).and_then(TokenNode::as_leaf).unwrap().value.clone()
    }

    #[test]
    fn test_clean_json_has_no_diagnostics() {
        let outcome = parse_token_file("a.json", r#"{"a": {"value": 1}}"#).unwrap();
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(value_at(&outcome.value, "a"), Scalar::Number(1.0));
    }

    #[test]
    fn test_trailing_commas() {
        let outcome = parse_token_file("a.json", "{\"a\": {\"value\": \"x,\",},\n}").unwrap();
        assert_eq!(value_at(&outcome.value, "a"), Scalar::Text("x,".into()));
        assert_eq!(outcome.diagnostics.count_kind(DiagnosticKind::Parse), 1);
    }

    #[test]
    fn test_comments_preserve_urls_in_strings() {
        let text = r#"{
            // line comment
            "font": {"value": "https://example.com/font.woff"}, /* block */
            "b": {"value": 2}
        }"#;
        let outcome = parse_token_file("a.json", text).unwrap();
        assert_eq!(
            value_at(&outcome.value, "font"),
            Scalar::Text("https://example.com/font.woff".into())
        );
        assert_eq!(value_at(&outcome.value, "b"), Scalar::Number(2.0));
    }

    #[test]
    fn test_trailing_garbage_is_truncated() {
        let outcome = parse_token_file("a.json", r#"{"a": {"value": "}"}} trailing junk"#).unwrap();
        assert_eq!(value_at(&outcome.value, "a"), Scalar::Text("}".into()));
    }

    #[test]
    fn test_bom_is_ignored() {
        let outcome = parse_token_file("a.json", "\u{feff}{\"a\": {\"value\": true}}").unwrap();
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_unrecoverable_is_parse_error() {
        let err = parse_token_file("broken.json", "{\"a\": ").unwrap_err();
        assert!(matches!(err, Error::Parse { ref path, .. } if path == "broken.json"));
    }

    #[test]
    fn test_non_object_root_is_parse_error() {
        assert!(parse_token_file("list.json", "[1, 2]").is_err());
    }

    #[test]
    fn test_truncate_to_balanced() {
        assert_eq!(truncate_to_balanced("{\"a\":{}}xyz"), Some("{\"a\":{}}"));
        assert_eq!(truncate_to_balanced("{\"a\": 1"), None);
    }
}
