//! Repository host integration for tsdocbot
//!
//! The [`RepositoryHost`] trait covers everything the documentation engine
//! needs from a source-control host: branches, file commits, pull requests
//! and the file list of an existing pull request.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use tsdocbot_core::config::RepositoryConfig;
use tsdocbot_core::error::{Error, Result};

mod client;
pub mod error;
mod mock;

pub use client::GitHubClient;
pub use error::GithubError;
pub use mock::{CommittedFile, MockRepositoryHost};

/// How a pull request touched a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
}

/// One file of a pull request's change set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    /// Repository-relative path (the new path for renames)
    pub path: String,
    pub status: FileStatus,
    /// The file does not exist on the base branch
    pub is_new: bool,
    /// Where the head version can be fetched from
    pub contents_ref: Option<String>,
}

/// Everything needed to open a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestSpec {
    pub title: String,
    pub body: String,
    /// Branch with the changes
    pub head: String,
    /// Branch to merge into
    pub base: String,
    pub labels: Vec<String>,
    pub reviewers: Vec<String>,
}

/// An opened pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    pub number: u64,
    pub url: String,
}

/// Source-control host operations used by the engine
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Create branch `name` pointing at the head of `base`
    async fn create_branch(&self, name: &str, base: &str) -> Result<()>;

    /// Create or update one file on `branch`
    async fn commit_file(&self, branch: &str, path: &str, content: &str, message: &str)
        -> Result<()>;

    /// Open a pull request and apply its labels and reviewers
    async fn create_pull_request(&self, spec: &PullRequestSpec) -> Result<PullRequestRef>;

    /// Files touched by pull request `pull_number`
    async fn get_changed_files(&self, pull_number: u64) -> Result<Vec<FileChange>>;

    /// Content behind a [`FileChange::contents_ref`]
    async fn fetch_remote_file_content(&self, contents_ref: &str) -> Result<String>;
}

/// Create the GitHub client described by the repository configuration
pub fn create_repository_host(config: &RepositoryConfig) -> Result<Arc<dyn RepositoryHost>> {
    if config.owner.is_empty() || config.name.is_empty() {
        return Err(Error::config(
            "repository.owner and repository.name are required",
        ));
    }
    let token = config.resolve_token().ok_or_else(|| {
        Error::config("Repository token required. Set repository.token or GITHUB_TOKEN env var")
    })?;

    info!(
        "Creating GitHub client for {}/{}",
        config.owner, config.name
    );
    Ok(Arc::new(GitHubClient::new(config, token)?))
}
