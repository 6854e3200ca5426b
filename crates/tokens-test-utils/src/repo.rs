//! [`TokenRepo`] builder for token repository test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::fixtures;

/// A temporary token repository with helpers for setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use tokens_test_utils::repo::TokenRepo;
///
/// let repo = TokenRepo::multi_brand();
/// repo.write_settings("collection = \"Tokens\"\n");
/// repo.assert_file_exists("tokens/brands/acme/colors.json");
/// ```
pub struct TokenRepo {
    temp_dir: TempDir,
}

impl Default for TokenRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenRepo {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// A repository holding [`fixtures::multi_brand`].
    pub fn multi_brand() -> Self {
        let repo = Self::new();
        for (path, content) in fixtures::multi_brand() {
            repo.write(path, content);
        }
        repo
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `path` relative to the root.
    pub fn path(&self, path: &str) -> PathBuf {
        self.root().join(path)
    }

    /// Write a file, creating parent directories.
    pub fn write(&self, path: &str, content: &str) {
        let full_path = self.path(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
    }

    /// Write `tokens.toml` at the root.
    pub fn write_settings(&self, content: &str) {
        self.write("tokens.toml", content);
    }

    /// Read a file relative to the root.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read(&self, path: &str) -> String {
        let full_path = self.path(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// Parse a file relative to the root as JSON.
    ///
    /// # Panics
    /// Panics if the file is missing or not JSON.
    pub fn read_json(&self, path: &str) -> serde_json::Value {
        let content = self.read(path);
        serde_json::from_str(&content)
            .unwrap_or_else(|e| panic!("{} is not valid JSON: {}", path, e))
    }

    /// Assert that `path` (relative to the repo root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the repo root) does **not** exist.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` contains `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read(path);
        assert!(
            file_content.contains(content),
            "Expected {} to contain {:?}, got:\n{}",
            path,
            content,
            file_content
        );
    }
}
