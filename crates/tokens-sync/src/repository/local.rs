//! Repository backed by a local working tree

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use walkdir::{DirEntry, WalkDir};

use super::{PathMatcher, PullRequest, PullRequestDraft, RepositoryAdapter};
use crate::error::{Error, Result};

/// Directory, relative to the root, where pull request bodies are written
pub const PULL_REQUEST_DIR: &str = ".tokens/pull-requests";

/// A repository rooted at a local directory.
///
/// There is no branching: writes land in the working tree. Branch names are
/// recorded so that writes to an unknown branch still fail, and each pull
/// request body is written to [`PULL_REQUEST_DIR`] for review.
#[derive(Debug)]
pub struct LocalRepository {
    root: PathBuf,
    base_branch: String,
    branches: Mutex<Vec<String>>,
    pull_requests: Mutex<Vec<PullRequest>>,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_base_branch(root, "main")
    }

    pub fn with_base_branch(root: impl Into<PathBuf>, base_branch: impl Into<String>) -> Self {
        let base_branch = base_branch.into();
        Self {
            root: root.into(),
            branches: Mutex::new(vec![base_branch.clone()]),
            base_branch,
            pull_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn base_branch(&self) -> &str {
        &self.base_branch
    }

    /// Resolve a repository path, refusing anything that escapes the root
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        if relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(Error::Repository(format!("path escapes repository: {}", path)));
        }
        Ok(self.root.join(relative))
    }

    async fn ensure_branch(&self, name: &str) -> Result<()> {
        if self.branches.lock().await.iter().any(|b| b == name) {
            Ok(())
        } else {
            Err(Error::BranchNotFound {
                name: name.to_string(),
            })
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

#[async_trait]
impl RepositoryAdapter for LocalRepository {
    async fn list_files(&self, patterns: &[String], excludes: &[String]) -> Result<Vec<String>> {
        let matcher = PathMatcher::new(patterns, excludes)?;
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e));
        for entry in walker {
            let entry = entry.map_err(|e| Error::Repository(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if matcher.is_match(&relative) {
                files.push(relative);
            }
        }
        tracing::debug!(root = %self.root.display(), count = files.len(), "listed token files");
        Ok(files)
    }

    async fn fetch_file(&self, path: &str) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.resolve(path)?).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_branch(&self, name: &str, base: &str) -> Result<()> {
        self.ensure_branch(base).await?;
        let mut branches = self.branches.lock().await;
        if branches.iter().any(|b| b == name) {
            return Err(Error::BranchExists {
                name: name.to_string(),
            });
        }
        branches.push(name.to_string());
        Ok(())
    }

    async fn write_file(&self, branch: &str, path: &str, content: &str, message: &str) -> Result<()> {
        self.ensure_branch(branch).await?;
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tracing::debug!(branch, path, message, "writing file");
        tokio::fs::write(&target, content).await?;
        Ok(())
    }

    async fn open_pull_request(&self, draft: &PullRequestDraft) -> Result<PullRequest> {
        self.ensure_branch(&draft.branch).await?;
        let file_name = format!("{}.md", draft.branch.replace(['/', '\\'], "-"));
        let relative = format!("{}/{}", PULL_REQUEST_DIR, file_name);
        let target = self.resolve(&relative)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let document = format!(
            "# {}\n\n{} -> {}\n\n{}",
            draft.title, draft.branch, draft.base, draft.body
        );
        tokio::fs::write(&target, document).await?;

        let mut pull_requests = self.pull_requests.lock().await;
        let pr = PullRequest {
            number: pull_requests.len() as u64 + 1,
            url: relative,
            branch: draft.branch.clone(),
            base: draft.base.clone(),
            title: draft.title.clone(),
        };
        pull_requests.push(pr.clone());
        Ok(pr)
    }
}
