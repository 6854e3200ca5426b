//! Sync settings loaded from `tokens.toml`
//!
//! Every field has a default, so an empty or missing file is a valid
//! configuration:
//!
//! ```toml
//! collection = "Design Tokens"
//! file_patterns = ["tokens/**/*.json"]
//! exclude_patterns = []
//!
//! [modes]
//! strategy = "auto"
//!
//! [export]
//! path = "tokens/tokens.json"
//! brand_path = "tokens/brands/{brand}/tokens.json"
//! branch_prefix = "tokens/update"
//! base_branch = "main"
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use globset::Glob;
use serde::{Deserialize, Serialize};
use tokens_core::StructureClassifier;

use crate::error::{Error, Result};

/// File name looked up in a token repository root
pub const SETTINGS_FILE: &str = "tokens.toml";

/// Placeholder substituted with the brand name in export paths
pub const BRAND_PLACEHOLDER: &str = "{brand}";

/// Name of the mode holding the foundation
pub const DEFAULT_MODE: &str = "Default";

/// How merged trees are mapped onto store modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeStrategy {
    /// Foundation in the default mode, one additional mode per brand
    #[default]
    Auto,
    /// A single named mode receiving one tree
    Target,
}

impl FromStr for ModeStrategy {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ModeStrategy::Auto),
            "target" => Ok(ModeStrategy::Target),
            _ => Err(Error::settings(format!("unknown mode strategy '{}'", s))),
        }
    }
}

impl fmt::Display for ModeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeStrategy::Auto => write!(f, "auto"),
            ModeStrategy::Target => write!(f, "target"),
        }
    }
}

/// Mode mapping settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeSettings {
    pub strategy: ModeStrategy,
    /// Mode name written to under [`ModeStrategy::Target`]
    pub target: Option<String>,
    /// Brand whose tree is written under [`ModeStrategy::Target`].
    /// The foundation is used when unset.
    pub brand: Option<String>,
}

/// Where and how exported files are proposed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub path: String,
    pub brand_path: String,
    pub branch_prefix: String,
    pub base_branch: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            path: "tokens/tokens.json".to_string(),
            brand_path: format!("tokens/brands/{}/tokens.json", BRAND_PLACEHOLDER),
            branch_prefix: "tokens/update".to_string(),
            base_branch: "main".to_string(),
        }
    }
}

impl ExportSettings {
    /// The export path for one brand's overrides
    pub fn brand_file(&self, brand: &str) -> String {
        self.brand_path.replace(BRAND_PLACEHOLDER, brand)
    }
}

/// Top-level sync configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Store collection receiving the variables
    pub collection: String,
    /// Globs selecting token files, relative to the repository root
    pub file_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    /// Regex with one capture group naming the brand
    pub brand_folder_pattern: Option<String>,
    pub modes: ModeSettings,
    pub export: ExportSettings,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            collection: "Design Tokens".to_string(),
            file_patterns: vec!["tokens/**/*.json".to_string()],
            exclude_patterns: Vec::new(),
            brand_folder_pattern: None,
            modes: ModeSettings::default(),
            export: ExportSettings::default(),
        }
    }
}

impl SyncSettings {
    /// Parse settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Settings`] when the TOML is malformed or fails
    /// [`SyncSettings::validate`].
    pub fn parse(content: &str) -> Result<Self> {
        let settings: SyncSettings =
            toml::from_str(content).map_err(|e| Error::settings(e.message().to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a file. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SettingsFile`] when the file exists but is invalid.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| Error::SettingsFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Check the settings for values that can never work.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Settings`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.collection.trim().is_empty() {
            return Err(Error::settings("collection name must not be empty"));
        }
        if self.file_patterns.is_empty() {
            return Err(Error::settings("at least one file pattern is required"));
        }
        for pattern in self.file_patterns.iter().chain(&self.exclude_patterns) {
            Glob::new(pattern)?;
        }
        StructureClassifier::new(self.brand_folder_pattern.as_deref())?;

        if self.modes.strategy == ModeStrategy::Target
            && self.modes.target.as_deref().is_none_or(|t| t.trim().is_empty())
        {
            return Err(Error::settings("the target strategy requires modes.target"));
        }
        if self.export.path.trim().is_empty() {
            return Err(Error::settings("export.path must not be empty"));
        }
        if !self.export.brand_path.contains(BRAND_PLACEHOLDER) {
            return Err(Error::settings(format!(
                "export.brand_path must contain {}",
                BRAND_PLACEHOLDER
            )));
        }
        Ok(())
    }

    /// Mode name the foundation (or target tree) is written to
    pub fn primary_mode(&self) -> &str {
        match self.modes.strategy {
            ModeStrategy::Auto => DEFAULT_MODE,
            ModeStrategy::Target => self.modes.target.as_deref().unwrap_or(DEFAULT_MODE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_empty_file_is_defaults() {
        assert_eq!(SyncSettings::parse("").unwrap(), SyncSettings::default());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let settings = SyncSettings::parse(
            r#"
            collection = "Brand Tokens"

            [export]
            base_branch = "develop"
            "#,
        )
        .unwrap();
        assert_eq!(settings.collection, "Brand Tokens");
        assert_eq!(settings.export.base_branch, "develop");
        assert_eq!(settings.export.path, "tokens/tokens.json");
        assert_eq!(settings.modes.strategy, ModeStrategy::Auto);
    }

    #[test]
    fn test_target_strategy() {
        let settings = SyncSettings::parse(
            r#"
            [modes]
            strategy = "target"
            target = "Light"
            brand = "acme"
            "#,
        )
        .unwrap();
        assert_eq!(settings.primary_mode(), "Light");
        assert_eq!(settings.modes.brand.as_deref(), Some("acme"));
    }

    #[rstest]
    #[case::empty_collection("collection = \"\"")]
    #[case::bad_glob("file_patterns = [\"tokens/[\"]")]
    #[case::bad_brand_regex("brand_folder_pattern = \"brands/[^/]+/\"")]
    #[case::target_without_name("[modes]\nstrategy = \"target\"")]
    #[case::brand_path_without_placeholder("[export]\nbrand_path = \"out.json\"")]
    #[case::unknown_strategy("[modes]\nstrategy = \"sometimes\"")]
    fn test_invalid_settings(#[case] content: &str) {
        assert!(SyncSettings::parse(content).is_err());
    }

    #[test]
    fn test_load_missing_file_is_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = SyncSettings::load(&dir.path().join(SETTINGS_FILE)).unwrap();
        assert_eq!(settings, SyncSettings::default());
    }

    #[test]
    fn test_load_reports_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "collection = 3").unwrap();
        let err = SyncSettings::load(&path).unwrap_err();
        assert!(matches!(err, Error::SettingsFile { .. }));
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("Target".parse::<ModeStrategy>().unwrap(), ModeStrategy::Target);
        assert_eq!(ModeStrategy::Auto.to_string(), "auto");
        assert!("other".parse::<ModeStrategy>().is_err());
    }

    #[test]
    fn test_brand_file() {
        assert_eq!(
            ExportSettings::default().brand_file("acme"),
            "tokens/brands/acme/tokens.json"
        );
    }
}
