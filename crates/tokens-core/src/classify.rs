//! Repository layout classification
//!
//! Token repositories split their files into shared foundations and
//! per-brand overrides by folder convention. The classifier sorts each file
//! path into one of three buckets:
//!
//! - **global**: a `global`/`globals` folder or file name
//! - **base**: a `base`/`core`/`palette` folder or file name
//! - **brand**: a folder matched by the brand pattern
//!   (`brands/<name>/`, `themes/<name>/`, `variants/<name>/`, ...),
//!   `tokens/<name>/`, or `<name>/tokens/`
//!
//! Anything else, or a brand candidate whose name is reserved, counts as
//! global. Brands are listed in the order they are first seen.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Folder names that can never be brands
pub const RESERVED_BRAND_NAMES: &[&str] = &[
    "global",
    "globals",
    "base",
    "core",
    "palette",
    "foundation",
    "primitives",
    "common",
];

const GLOBAL_NAMES: &[&str] = &["global", "globals"];
const BASE_NAMES: &[&str] = &["base", "core", "palette"];

/// Default brand folder pattern; group 1 is the brand name
pub const DEFAULT_BRAND_FOLDER_PATTERN: &str =
    r"(?i)(?:^|/)(?:brand|brands|theme|themes|variant|variants)/([^/]+)/";

static TOKENS_CHILD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|/)tokens/([^/]+)/").unwrap());

static TOKENS_PARENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|/)([^/]+)/tokens/").unwrap());

/// Which partition a file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Base,
    Global,
    Brand,
}

/// A brand and the files that override the foundation for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub name: String,
    pub files: Vec<String>,
}

/// The classified layout of a token repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandStructure {
    pub brands: Vec<Brand>,
    pub global_files: Vec<String>,
    pub base_files: Vec<String>,
}

impl BrandStructure {
    /// Any brand present means one host mode per brand
    pub fn is_multi_brand(&self) -> bool {
        !self.brands.is_empty()
    }

    pub fn brand(&self, name: &str) -> Option<&Brand> {
        self.brands.iter().find(|b| b.name == name)
    }

    pub fn brand_names(&self) -> impl Iterator<Item = &str> {
        self.brands.iter().map(|b| b.name.as_str())
    }

    /// Category (and brand name) a path was classified into
    pub fn category_of(&self, path: &str) -> Option<(FileCategory, Option<&str>)> {
        if self.base_files.iter().any(|p| p == path) {
            return Some((FileCategory::Base, None));
        }
        if self.global_files.iter().any(|p| p == path) {
            return Some((FileCategory::Global, None));
        }
        self.brands
            .iter()
            .find(|b| b.files.iter().any(|p| p == path))
            .map(|b| (FileCategory::Brand, Some(b.name.as_str())))
    }

    /// Total number of classified files
    pub fn file_count(&self) -> usize {
        self.base_files.len()
            + self.global_files.len()
            + self.brands.iter().map(|b| b.files.len()).sum::<usize>()
    }

    fn push_brand_file(&mut self, name: &str, path: String) {
        match self.brands.iter_mut().find(|b| b.name == name) {
            Some(brand) => brand.files.push(path),
            None => self.brands.push(Brand {
                name: name.to_string(),
                files: vec![path],
            }),
        }
    }
}

/// Classifies file paths into base, global and brand buckets
#[derive(Debug, Clone)]
pub struct StructureClassifier {
    brand_folder: Regex,
}

impl Default for StructureClassifier {
    fn default() -> Self {
        Self {
            brand_folder: Regex::new(DEFAULT_BRAND_FOLDER_PATTERN).unwrap(),
        }
    }
}

impl StructureClassifier {
    /// Build a classifier, optionally replacing the brand folder pattern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if the custom pattern does not compile
    /// or has no capturing group for the brand name.
    pub fn new(brand_folder_pattern: Option<&str>) -> Result<Self> {
        let Some(pattern) = brand_folder_pattern else {
            return Ok(Self::default());
        };
        let brand_folder = Regex::new(pattern).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        if brand_folder.captures_len() < 2 {
            return Err(Error::InvalidPattern {
                pattern: pattern.to_string(),
                message: "pattern needs a capturing group for the brand name".to_string(),
            });
        }
        Ok(Self { brand_folder })
    }

    /// Classify a single path
    pub fn categorize(&self, path: &str) -> (FileCategory, Option<String>) {
        let normalized = path.replace('\\', "/");

        if has_name(&normalized, GLOBAL_NAMES) {
            return (FileCategory::Global, None);
        }
        if has_name(&normalized, BASE_NAMES) {
            return (FileCategory::Base, None);
        }

        match self.brand_candidate(&normalized) {
            Some(name) if !is_reserved(&name) => (FileCategory::Brand, Some(name)),
            _ => (FileCategory::Global, None),
        }
    }

    /// Classify every path, in order
    pub fn classify<S: AsRef<str>>(&self, paths: &[S]) -> BrandStructure {
        let mut structure = BrandStructure::default();
        for path in paths {
            let path = path.as_ref();
            match self.categorize(path) {
                (FileCategory::Base, _) => structure.base_files.push(path.to_string()),
                (FileCategory::Brand, Some(name)) => {
                    structure.push_brand_file(&name, path.to_string())
                }
                _ => structure.global_files.push(path.to_string()),
            }
        }
        tracing::debug!(
            brands = structure.brands.len(),
            base = structure.base_files.len(),
            global = structure.global_files.len(),
            "classified token files"
        );
        structure
    }

    fn brand_candidate(&self, path: &str) -> Option<String> {
        [&self.brand_folder, &*TOKENS_CHILD, &*TOKENS_PARENT]
            .into_iter()
            .find_map(|re| re.captures(path).and_then(|c| c.get(1)))
            .map(|m| m.as_str().to_string())
    }
}

/// Classify with an optional custom brand folder pattern
pub fn classify<S: AsRef<str>>(paths: &[S], brand_folder_pattern: Option<&str>) -> Result<BrandStructure> {
    Ok(StructureClassifier::new(brand_folder_pattern)?.classify(paths))
}

pub fn is_reserved(name: &str) -> bool {
    RESERVED_BRAND_NAMES
        .iter()
        .any(|r| r.eq_ignore_ascii_case(name))
}

/// True if any folder segment, or the file name up to its first dot, is one of `names`
fn has_name(path: &str, names: &[&str]) -> bool {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let Some(file) = segments.pop() else {
        return false;
    };
    let stem = file.split('.').next().unwrap_or(file);
    segments
        .into_iter()
        .chain(std::iter::once(stem))
        .any(|s| names.iter().any(|n| n.eq_ignore_ascii_case(s)))
}
