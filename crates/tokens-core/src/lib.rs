//! Token tree transformation and multi-brand resolution engine
//!
//! Converts design tokens between nested JSON token trees and the flat,
//! mode-aware records a variable store holds:
//!
//! - [`node`]: the token tree model and its JSON boundary
//! - [`path`]: flatten/unflatten between trees and flat tokens
//! - [`kind`] and [`convert`]: primitive kind inference and canonical values
//! - [`resolve`]: `{dotted.path}` alias resolution with cycle detection
//! - [`classify`]: base/global/brand classification of repository files
//! - [`merge`]: foundation and per-brand tree construction
//! - [`diff`]: added/modified/removed summaries between two trees
//! - [`parse`]: tolerant parsing of hand-edited token files
//!
//! Every operation is a pure function over owned values. Recoverable
//! problems come back as [`Diagnostic`]s inside an [`Outcome`] rather than
//! as errors.

pub mod classify;
pub mod convert;
pub mod diagnostics;
pub mod diff;
pub mod error;
pub mod kind;
pub mod merge;
pub mod node;
pub mod parse;
pub mod path;
pub mod resolve;

pub use classify::{Brand, BrandStructure, FileCategory, StructureClassifier, classify};
pub use convert::{
    CanonicalValue, Rgba, from_canonical_color, to_canonical, to_canonical_color,
    to_canonical_number,
};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Outcome, Severity};
pub use diff::{ChangeSet, diff};
pub use error::{Error, Result};
pub use kind::TokenKind;
pub use merge::{
    BrandTree, BrandTrees, ProcessedFile, build_all, build_brand_tree, build_foundation,
    deep_merge,
};
pub use node::{Leaf, Scalar, TokenNode};
pub use parse::parse_token_file;
pub use path::{FlatToken, flatten, unflatten, unflatten_all};
pub use resolve::resolve;

/// Resolve a tree against itself
pub fn resolve_tree(tree: &TokenNode) -> Outcome<TokenNode> {
    resolve(tree, tree)
}
