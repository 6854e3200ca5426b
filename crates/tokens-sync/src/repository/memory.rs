//! In-memory repository with branches and recorded pull requests

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{PathMatcher, PullRequest, PullRequestDraft, RepositoryAdapter, decode_content, encode_content};
use crate::error::{Error, Result};

type Files = BTreeMap<String, String>;

/// A repository held in memory.
///
/// File content is stored base64-encoded per branch, as a hosted content
/// API would return it. Reads go to the default branch.
#[derive(Debug)]
pub struct MemoryRepository {
    default_branch: String,
    branches: Mutex<BTreeMap<String, Files>>,
    pull_requests: Mutex<Vec<PullRequest>>,
}

impl MemoryRepository {
    pub fn new(default_branch: impl Into<String>) -> Self {
        let default_branch = default_branch.into();
        let mut branches = BTreeMap::new();
        branches.insert(default_branch.clone(), Files::new());
        Self {
            default_branch,
            branches: Mutex::new(branches),
            pull_requests: Mutex::new(Vec::new()),
        }
    }

    /// Add a file to the default branch
    pub fn with_file(mut self, path: impl Into<String>, content: &str) -> Self {
        if let Some(files) = self.branches.get_mut().get_mut(&self.default_branch) {
            files.insert(path.into(), encode_content(content));
        }
        self
    }

    /// Decoded content of a file on any branch
    pub async fn file_on(&self, branch: &str, path: &str) -> Result<Option<String>> {
        let branches = self.branches.lock().await;
        let files = branches.get(branch).ok_or_else(|| Error::BranchNotFound {
            name: branch.to_string(),
        })?;
        files.get(path).map(|encoded| decode_content(encoded)).transpose()
    }

    pub async fn branch_names(&self) -> Vec<String> {
        self.branches.lock().await.keys().cloned().collect()
    }

    pub async fn pull_requests(&self) -> Vec<PullRequest> {
        self.pull_requests.lock().await.clone()
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new("main")
    }
}

#[async_trait]
impl RepositoryAdapter for MemoryRepository {
    async fn list_files(&self, patterns: &[String], excludes: &[String]) -> Result<Vec<String>> {
        let matcher = PathMatcher::new(patterns, excludes)?;
        let branches = self.branches.lock().await;
        Ok(branches
            .get(&self.default_branch)
            .map(|files| files.keys().filter(|p| matcher.is_match(p)).cloned().collect())
            .unwrap_or_default())
    }

    async fn fetch_file(&self, path: &str) -> Result<Option<String>> {
        self.file_on(&self.default_branch, path).await
    }

    async fn create_branch(&self, name: &str, base: &str) -> Result<()> {
        let mut branches = self.branches.lock().await;
        if branches.contains_key(name) {
            return Err(Error::BranchExists {
                name: name.to_string(),
            });
        }
        let files = branches
            .get(base)
            .cloned()
            .ok_or_else(|| Error::BranchNotFound {
                name: base.to_string(),
            })?;
        branches.insert(name.to_string(), files);
        Ok(())
    }

    async fn write_file(&self, branch: &str, path: &str, content: &str, message: &str) -> Result<()> {
        let mut branches = self.branches.lock().await;
        let files = branches.get_mut(branch).ok_or_else(|| Error::BranchNotFound {
            name: branch.to_string(),
        })?;
        tracing::debug!(branch, path, message, "writing file");
        files.insert(path.to_string(), encode_content(content));
        Ok(())
    }

    async fn open_pull_request(&self, draft: &PullRequestDraft) -> Result<PullRequest> {
        if !self.branches.lock().await.contains_key(&draft.branch) {
            return Err(Error::BranchNotFound {
                name: draft.branch.clone(),
            });
        }
        let mut pull_requests = self.pull_requests.lock().await;
        let number = pull_requests.len() as u64 + 1;
        let pr = PullRequest {
            number,
            url: format!("memory://pulls/{}", number),
            branch: draft.branch.clone(),
            base: draft.base.clone(),
            title: draft.title.clone(),
        };
        pull_requests.push(pr.clone());
        Ok(pr)
    }
}
