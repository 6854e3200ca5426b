//! Remote repository abstraction
//!
//! Token files live in a version-controlled repository reached through a
//! hosted API. The pipelines only need to list, read and write files,
//! create a branch and open a pull request.

mod local;
mod memory;

pub use local::LocalRepository;
pub use memory::MemoryRepository;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A pull request as requested by the export pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestDraft {
    pub branch: String,
    pub base: String,
    pub title: String,
    pub body: String,
}

/// A pull request opened on the remote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub url: String,
    pub branch: String,
    pub base: String,
    pub title: String,
}

/// Async access to a token repository
#[async_trait]
pub trait RepositoryAdapter: Send + Sync {
    /// Paths of files matching any of `patterns` and none of `excludes`,
    /// relative to the repository root with `/` separators.
    async fn list_files(&self, patterns: &[String], excludes: &[String]) -> Result<Vec<String>>;

    /// Content of a file on the base branch, or `None` when it does not exist
    async fn fetch_file(&self, path: &str) -> Result<Option<String>>;

    async fn create_branch(&self, name: &str, base: &str) -> Result<()>;

    async fn write_file(&self, branch: &str, path: &str, content: &str, message: &str)
    -> Result<()>;

    async fn open_pull_request(&self, draft: &PullRequestDraft) -> Result<PullRequest>;
}

/// Include/exclude glob matching for repository paths
#[derive(Debug, Clone)]
pub struct PathMatcher {
    include: GlobSet,
    exclude: GlobSet,
}

impl PathMatcher {
    /// # Errors
    ///
    /// Returns an error when any pattern is not a valid glob.
    pub fn new(patterns: &[String], excludes: &[String]) -> Result<Self> {
        Ok(Self {
            include: build_set(patterns)?,
            exclude: build_set(excludes)?,
        })
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.include.is_match(path) && !self.exclude.is_match(path)
    }
}

fn build_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Encode file content the way hosted content APIs transport it
pub fn encode_content(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

/// Decode base64 file content. Line breaks inserted by the remote are ignored.
///
/// # Errors
///
/// Returns an error when the payload is not base64 or not UTF-8 text.
pub fn decode_content(encoded: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;
    String::from_utf8(bytes).map_err(|e| crate::Error::Repository(format!("file is not UTF-8: {}", e)))
}
