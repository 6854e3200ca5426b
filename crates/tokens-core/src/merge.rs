//! Foundation and per-brand tree construction
//!
//! The foundation is every base file merged in input order, followed by
//! every global file. Each brand tree starts as a copy of the foundation with
//! that brand's files merged on top.

use serde::{Deserialize, Serialize};

use crate::classify::{BrandStructure, FileCategory};
use crate::node::TokenNode;

/// A parsed token file with its classification
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedFile {
    pub path: String,
    pub tokens: TokenNode,
    pub category: FileCategory,
    pub brand: Option<String>,
}

impl ProcessedFile {
    /// Attach the classification recorded in `structure`.
    ///
    /// Paths unknown to the structure are treated as global.
    pub fn classified(path: impl Into<String>, tokens: TokenNode, structure: &BrandStructure) -> Self {
        let path = path.into();
        let (category, brand) = match structure.category_of(&path) {
            Some((category, brand)) => (category, brand.map(str::to_string)),
            None => (FileCategory::Global, None),
        };
        Self {
            path,
            tokens,
            category,
            brand,
        }
    }
}

/// Merge `overlay` into `base`.
///
/// Groups merge key by key, recursively. In every other combination the
/// overlay node replaces the base node whole; leaves are never partially
/// merged.
pub fn deep_merge(base: &mut TokenNode, overlay: &TokenNode) {
    match (base, overlay) {
        (TokenNode::Group(base_map), TokenNode::Group(overlay_map)) => {
            for (key, overlay_child) in overlay_map {
                match base_map.get_mut(key) {
                    Some(base_child) => deep_merge(base_child, overlay_child),
                    None => {
                        base_map.insert(key.clone(), overlay_child.clone());
                    }
                }
            }
        }
        (base, overlay) => {
            *base = overlay.clone();
        }
    }
}

/// Merge all base files, then all global files, in input order
pub fn build_foundation(files: &[ProcessedFile]) -> TokenNode {
    let mut foundation = TokenNode::group();
    for category in [FileCategory::Base, FileCategory::Global] {
        for file in files.iter().filter(|f| f.category == category) {
            tracing::debug!(path = %file.path, ?category, "merging into foundation");
            deep_merge(&mut foundation, &file.tokens);
        }
    }
    foundation
}

/// Copy the foundation and merge the brand's files on top, in order
pub fn build_brand_tree<'a>(
    brand: &str,
    foundation: &TokenNode,
    brand_files: impl IntoIterator<Item = &'a ProcessedFile>,
) -> TokenNode {
    let mut tree = foundation.clone();
    for file in brand_files {
        tracing::debug!(brand, path = %file.path, "merging brand file");
        deep_merge(&mut tree, &file.tokens);
    }
    tree
}

/// A fully merged tree for one brand
#[derive(Debug, Clone, PartialEq)]
pub struct BrandTree {
    pub name: String,
    pub tree: TokenNode,
}

/// The foundation plus one merged tree per brand
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BrandTrees {
    pub foundation: TokenNode,
    pub brands: Vec<BrandTree>,
}

impl BrandTrees {
    pub fn is_multi_brand(&self) -> bool {
        !self.brands.is_empty()
    }

    pub fn brand(&self, name: &str) -> Option<&TokenNode> {
        self.brands.iter().find(|b| b.name == name).map(|b| &b.tree)
    }

    pub fn stats(&self) -> MergeStats {
        MergeStats {
            foundation_tokens: self.foundation.leaf_count(),
            brand_tokens: self
                .brands
                .iter()
                .map(|b| (b.name.clone(), b.tree.leaf_count()))
                .collect(),
        }
    }
}

/// Leaf counts of a merge, for logging and reports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    pub foundation_tokens: usize,
    pub brand_tokens: Vec<(String, usize)>,
}

/// Build the foundation and every brand tree, brands in discovery order
pub fn build_all(structure: &BrandStructure, files: &[ProcessedFile]) -> BrandTrees {
    let foundation = build_foundation(files);
    let brands = structure
        .brands
        .iter()
        .map(|brand| {
            let brand_files = files
                .iter()
                .filter(|f| f.category == FileCategory::Brand && f.brand.as_deref() == Some(brand.name.as_str()));
            BrandTree {
                name: brand.name.clone(),
                tree: build_brand_tree(&brand.name, &foundation, brand_files),
            }
        })
        .collect();
    BrandTrees { foundation, brands }
}
