//! In-memory repository host for tests

use crate::{FileChange, PullRequestRef, PullRequestSpec, RepositoryHost};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tsdocbot_core::error::{Error, Result};

/// A file committed through the mock host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedFile {
    pub branch: String,
    pub path: String,
    pub content: String,
    pub message: String,
}

#[derive(Debug, Default)]
struct MockData {
    branches: Vec<(String, String)>,
    commits: Vec<CommittedFile>,
    pull_requests: Vec<PullRequestSpec>,
    changed_files: HashMap<u64, Vec<FileChange>>,
    remote_files: HashMap<String, String>,
    failing_operations: Vec<String>,
}

/// Mock host that records every call
///
/// Commits to a branch that was never created are rejected, the same way a
/// real host would reject them.
#[derive(Debug, Clone, Default)]
pub struct MockRepositoryHost {
    data: Arc<Mutex<MockData>>,
}

impl MockRepositoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn data(&self) -> Result<MutexGuard<'_, MockData>> {
        self.data
            .lock()
            .map_err(|e| Error::host("mock", None, format!("Mock host lock poisoned: {e}")))
    }

    /// Files reported for `pull_number`
    pub fn with_changed_files(self, pull_number: u64, files: Vec<FileChange>) -> Self {
        if let Ok(mut data) = self.data.lock() {
            data.changed_files.insert(pull_number, files);
        }
        self
    }

    /// Content served for a `contents_ref`
    pub fn with_remote_file(self, contents_ref: impl Into<String>, content: impl Into<String>) -> Self {
        if let Ok(mut data) = self.data.lock() {
            data.remote_files.insert(contents_ref.into(), content.into());
        }
        self
    }

    /// Make an operation (`create_branch`, `commit_file`, `create_pull_request`,
    /// `get_changed_files`, `fetch_remote_file_content`) fail with a 422
    pub fn failing_on(self, operation: impl Into<String>) -> Self {
        if let Ok(mut data) = self.data.lock() {
            data.failing_operations.push(operation.into());
        }
        self
    }

    /// Created branches as `(name, base)`
    pub fn branches(&self) -> Vec<(String, String)> {
        self.data().map(|d| d.branches.clone()).unwrap_or_default()
    }

    pub fn commits(&self) -> Vec<CommittedFile> {
        self.data().map(|d| d.commits.clone()).unwrap_or_default()
    }

    pub fn pull_requests(&self) -> Vec<PullRequestSpec> {
        self.data()
            .map(|d| d.pull_requests.clone())
            .unwrap_or_default()
    }

    fn check(data: &MockData, operation: &str) -> Result<()> {
        if data.failing_operations.iter().any(|op| op == operation) {
            return Err(Error::host(
                operation,
                Some(422),
                "Mock failure requested",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl RepositoryHost for MockRepositoryHost {
    async fn create_branch(&self, name: &str, base: &str) -> Result<()> {
        let mut data = self.data()?;
        Self::check(&data, "create_branch")?;
        if data.branches.iter().any(|(existing, _)| existing == name) {
            return Err(Error::host(
                "create_branch",
                Some(422),
                format!("Reference already exists: {name}"),
            ));
        }
        data.branches.push((name.to_string(), base.to_string()));
        Ok(())
    }

    async fn commit_file(
        &self,
        branch: &str,
        path: &str,
        content: &str,
        message: &str,
    ) -> Result<()> {
        let mut data = self.data()?;
        Self::check(&data, "commit_file")?;
        if !data.branches.iter().any(|(name, _)| name == branch) {
            return Err(Error::host(
                "commit_file",
                Some(404),
                format!("Branch not found: {branch}"),
            ));
        }
        data.commits.push(CommittedFile {
            branch: branch.to_string(),
            path: path.to_string(),
            content: content.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }

    async fn create_pull_request(&self, spec: &PullRequestSpec) -> Result<PullRequestRef> {
        let mut data = self.data()?;
        Self::check(&data, "create_pull_request")?;
        data.pull_requests.push(spec.clone());
        let number = data.pull_requests.len() as u64;
        Ok(PullRequestRef {
            number,
            url: format!("https://github.com/mock/repo/pull/{number}"),
        })
    }

    async fn get_changed_files(&self, pull_number: u64) -> Result<Vec<FileChange>> {
        let data = self.data()?;
        Self::check(&data, "get_changed_files")?;
        data.changed_files
            .get(&pull_number)
            .cloned()
            .ok_or_else(|| {
                Error::host(
                    "get_changed_files",
                    Some(404),
                    format!("Pull request #{pull_number} not found"),
                )
            })
    }

    async fn fetch_remote_file_content(&self, contents_ref: &str) -> Result<String> {
        let data = self.data()?;
        Self::check(&data, "fetch_remote_file_content")?;
        data.remote_files.get(contents_ref).cloned().ok_or_else(|| {
            Error::host(
                "fetch_remote_file_content",
                Some(404),
                format!("No content for {contents_ref}"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_commit_requires_branch() {
        let host = MockRepositoryHost::new();
        assert!(host
            .commit_file("docs", "a.ts", "x", "docs: a.ts")
            .await
            .is_err());

        host.create_branch("docs", "main").await.expect("Failed to create branch");
        host.commit_file("docs", "a.ts", "x", "docs: a.ts")
            .await
            .expect("Failed to commit");
        assert_eq!(host.commits().len(), 1);
    }

    #[tokio::test]
    async fn test_failing_operation() {
        let host = MockRepositoryHost::new().failing_on("create_branch");
        let err = host
            .create_branch("docs", "main")
            .await
            .expect_err("Expected failure");
        assert!(!err.is_transient());
        assert!(host.branches().is_empty());
    }
}
