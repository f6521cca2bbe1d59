//! GitHub REST API client

use crate::error::GithubError;
use crate::{FileChange, FileStatus, PullRequestRef, PullRequestSpec, RepositoryHost};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};
use tsdocbot_core::config::RepositoryConfig;
use tsdocbot_core::error::{Error, Result};
use tsdocbot_core::{with_retry, RetryPolicy};

const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw+json";
const API_VERSION: &str = "2022-11-28";
const FILES_PER_PAGE: usize = 100;

#[derive(Debug, Deserialize)]
struct GitRef {
    object: GitObject,
}

#[derive(Debug, Deserialize)]
struct GitObject {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ContentMetadata {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestResponse {
    number: u64,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestFile {
    filename: String,
    status: String,
    contents_url: Option<String>,
}

impl From<PullRequestFile> for FileChange {
    fn from(file: PullRequestFile) -> Self {
        let status = match file.status.as_str() {
            "added" => FileStatus::Added,
            "removed" => FileStatus::Deleted,
            "renamed" => FileStatus::Renamed,
            _ => FileStatus::Modified,
        };
        Self {
            path: file.filename,
            is_new: status == FileStatus::Added,
            status,
            contents_ref: file.contents_url,
        }
    }
}

/// Client for one GitHub repository
pub struct GitHubClient {
    client: Client,
    api_base_url: Url,
    owner: String,
    name: String,
    token: String,
    retry_policy: RetryPolicy,
}

impl GitHubClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `config` - Repository coordinates, API base URL, timeout and retries
    /// * `token` - Token used as bearer authentication
    pub fn new(config: &RepositoryConfig, token: String) -> Result<Self> {
        let api_base_url = Url::parse(&config.api_base_url).map_err(|e| {
            GithubError::ConfigError(format!(
                "Invalid API base URL '{}': {e}",
                config.api_base_url
            ))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("tsdocbot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GithubError::ConfigError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base_url,
            owner: config.owner.clone(),
            name: config.name.clone(),
            token,
            retry_policy: RetryPolicy::new(config.retry_attempts),
        })
    }

    /// Override the backoff policy
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// `<base>/repos/<owner>/<name>/<segments...>` with every segment escaped
    fn repo_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GithubError::ConfigError("API base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["repos", self.owner.as_str(), self.name.as_str()])
            .extend(segments.iter().flat_map(|s| s.split('/')));
        Ok(url)
    }

    async fn send_once(
        &self,
        operation: &str,
        method: Method,
        url: Url,
        body: Option<&Value>,
        accept: &str,
    ) -> Result<Response> {
        let mut request = self
            .client
            .request(method, url)
            .bearer_auth(&self.token)
            .header(ACCEPT, accept)
            .header("X-GitHub-Api-Version", API_VERSION);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GithubError::RequestFailed {
                operation: operation.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        Err(GithubError::ApiError {
            operation: operation.to_string(),
            status: status.as_u16(),
            message,
        }
        .into())
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<T> {
        with_retry(&self.retry_policy, operation, || async {
            let response = self
                .send_once(operation, method.clone(), url.clone(), body.as_ref(), JSON_MEDIA_TYPE)
                .await?;
            let status = response.status().as_u16();
            response.json::<T>().await.map_err(|e| {
                Error::from(GithubError::InvalidResponse {
                    operation: operation.to_string(),
                    status,
                    message: e.to_string(),
                })
            })
        })
        .await
    }

    /// Send a request whose response body is not needed
    async fn request_unit(
        &self,
        operation: &str,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<()> {
        with_retry(&self.retry_policy, operation, || async {
            self.send_once(operation, method.clone(), url.clone(), body.as_ref(), JSON_MEDIA_TYPE)
                .await
                .map(|_| ())
        })
        .await
    }

    /// Blob sha of `path` on `branch`, `None` when the file does not exist there
    async fn existing_file_sha(&self, branch: &str, path: &str) -> Result<Option<String>> {
        let mut url = self.repo_url(&["contents", path])?;
        url.query_pairs_mut().append_pair("ref", branch);

        match self
            .request_json::<ContentMetadata>("get file metadata", Method::GET, url, None)
            .await
        {
            Ok(metadata) => Ok(Some(metadata.sha)),
            Err(Error::Host {
                status: Some(404), ..
            }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl RepositoryHost for GitHubClient {
    async fn create_branch(&self, name: &str, base: &str) -> Result<()> {
        let base_ref: GitRef = self
            .request_json(
                "get base branch",
                Method::GET,
                self.repo_url(&["git", "ref", "heads", base])?,
                None,
            )
            .await?;

        self.request_unit(
            "create branch",
            Method::POST,
            self.repo_url(&["git", "refs"])?,
            Some(json!({
                "ref": format!("refs/heads/{name}"),
                "sha": base_ref.object.sha,
            })),
        )
        .await?;

        info!("Created branch {name} from {base}");
        Ok(())
    }

    async fn commit_file(
        &self,
        branch: &str,
        path: &str,
        content: &str,
        message: &str,
    ) -> Result<()> {
        let sha = self.existing_file_sha(branch, path).await?;

        let mut body = json!({
            "message": message,
            "content": STANDARD.encode(content.as_bytes()),
            "branch": branch,
        });
        if let Some(sha) = sha {
            body["sha"] = Value::String(sha);
        }

        self.request_unit(
            "commit file",
            Method::PUT,
            self.repo_url(&["contents", path])?,
            Some(body),
        )
        .await?;

        debug!("Committed {path} to {branch}");
        Ok(())
    }

    async fn create_pull_request(&self, spec: &PullRequestSpec) -> Result<PullRequestRef> {
        let created: PullRequestResponse = self
            .request_json(
                "create pull request",
                Method::POST,
                self.repo_url(&["pulls"])?,
                Some(json!({
                    "title": spec.title,
                    "body": spec.body,
                    "head": spec.head,
                    "base": spec.base,
                })),
            )
            .await?;
        let number = created.number.to_string();

        if !spec.labels.is_empty() {
            self.request_unit(
                "add labels",
                Method::POST,
                self.repo_url(&["issues", &number, "labels"])?,
                Some(json!({ "labels": spec.labels })),
            )
            .await?;
        }

        if !spec.reviewers.is_empty() {
            self.request_unit(
                "request reviewers",
                Method::POST,
                self.repo_url(&["pulls", &number, "requested_reviewers"])?,
                Some(json!({ "reviewers": spec.reviewers })),
            )
            .await?;
        }

        info!("Opened pull request #{}: {}", created.number, created.html_url);
        Ok(PullRequestRef {
            number: created.number,
            url: created.html_url,
        })
    }

    async fn get_changed_files(&self, pull_number: u64) -> Result<Vec<FileChange>> {
        let number = pull_number.to_string();
        let mut changes = Vec::new();

        for page in 1.. {
            let mut url = self.repo_url(&["pulls", &number, "files"])?;
            url.query_pairs_mut()
                .append_pair("per_page", &FILES_PER_PAGE.to_string())
                .append_pair("page", &page.to_string());

            let files: Vec<PullRequestFile> = self
                .request_json("list pull request files", Method::GET, url, None)
                .await?;
            let last_page = files.len() < FILES_PER_PAGE;
            changes.extend(files.into_iter().map(FileChange::from));
            if last_page {
                break;
            }
        }

        debug!(
            "Pull request #{pull_number} touches {} files",
            changes.len()
        );
        Ok(changes)
    }

    async fn fetch_remote_file_content(&self, contents_ref: &str) -> Result<String> {
        let url = match Url::parse(contents_ref) {
            Ok(url) => url,
            Err(_) => self.repo_url(&["contents", contents_ref.trim_start_matches('/')])?,
        };

        with_retry(&self.retry_policy, "fetch file content", || async {
            let response = self
                .send_once(
                    "fetch file content",
                    Method::GET,
                    url.clone(),
                    None,
                    RAW_MEDIA_TYPE,
                )
                .await?;
            let status = response.status().as_u16();
            response.text().await.map_err(|e| {
                Error::from(GithubError::InvalidResponse {
                    operation: "fetch file content".to_string(),
                    status,
                    message: e.to_string(),
                })
            })
        })
        .await
    }
}
