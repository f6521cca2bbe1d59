//! Configuration module for tsdocbot
//!
//! This module provides configuration structures and loading mechanisms.
//! Configuration can be loaded from a TOML file and/or environment variables.

mod defaults;
mod loading;


use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

pub use defaults::CONFIG_FILE_NAME;

use defaults::*;

/// Valid values for `llm.provider`
pub const LLM_PROVIDERS: &[&str] = &["openai", "mock"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Repository host configuration
    #[serde(default)]
    pub repository: RepositoryConfig,

    /// File selection configuration
    #[serde(default)]
    pub files: FilesConfig,

    /// Branch, commit and pull request settings
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Comment synthesis configuration
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Repository host (GitHub) configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Repository owner (user or organization)
    #[serde(default)]
    pub owner: String,

    /// Repository name
    #[serde(default)]
    pub name: String,

    /// Branch pull requests are opened against
    #[serde(default = "default_base_branch")]
    pub base_branch: String,

    /// Pull request to document; full-repository mode when absent
    #[serde(default)]
    pub pull_number: Option<u64>,

    /// REST API base URL
    #[serde(default = "default_github_api_url")]
    pub api_base_url: String,

    /// API token (or use GITHUB_TOKEN env var)
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_host_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for transient host failures
    #[serde(default = "default_host_retry_attempts")]
    pub retry_attempts: usize,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            name: String::new(),
            base_branch: default_base_branch(),
            pull_number: None,
            api_base_url: default_github_api_url(),
            token: None,
            timeout_secs: default_host_timeout_secs(),
            retry_attempts: default_host_retry_attempts(),
        }
    }
}

impl std::fmt::Debug for RepositoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryConfig")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("base_branch", &self.base_branch)
            .field("pull_number", &self.pull_number)
            .field("api_base_url", &self.api_base_url)
            .field("token", &self.token.as_ref().map(|_| "***REDACTED***"))
            .field("timeout_secs", &self.timeout_secs)
            .field("retry_attempts", &self.retry_attempts)
            .finish()
    }
}

impl RepositoryConfig {
    /// Token from config, falling back to the GITHUB_TOKEN env var
    pub fn resolve_token(&self) -> Option<String> {
        self.token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
    }
}

/// Which files are scanned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Directory to scan, relative to the repository root
    #[serde(default = "default_root_directory")]
    pub root_directory: String,

    /// Directory names excluded wherever they appear in a path
    #[serde(default = "default_excluded_directories")]
    pub excluded_directories: Vec<String>,

    /// File paths (or path suffixes) to exclude
    #[serde(default)]
    pub excluded_files: Vec<String>,

    /// Additional glob patterns to exclude
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Files larger than this are skipped
    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            root_directory: default_root_directory(),
            excluded_directories: default_excluded_directories(),
            excluded_files: Vec::new(),
            exclude_patterns: Vec::new(),
            max_file_size_bytes: default_max_file_size_bytes(),
        }
    }
}

/// Branch, commit and pull request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Prefix of the documentation branch name
    #[serde(default = "default_branch_prefix")]
    pub branch_prefix: String,

    /// Commit message; `{file}` is replaced by the file's base name
    #[serde(default = "default_commit_message_template")]
    pub commit_message_template: String,

    /// Labels applied to the pull request
    #[serde(default = "default_pull_request_labels")]
    pub pull_request_labels: Vec<String>,

    /// Reviewers requested on the pull request
    #[serde(default)]
    pub pull_request_reviewers: Vec<String>,

    /// Maximum in-flight synthesis requests
    #[serde(default = "default_synthesis_concurrency")]
    pub synthesis_concurrency: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            branch_prefix: default_branch_prefix(),
            commit_message_template: default_commit_message_template(),
            pull_request_labels: default_pull_request_labels(),
            pull_request_reviewers: Vec::new(),
            synthesis_concurrency: default_synthesis_concurrency(),
        }
    }
}

impl GeneratorConfig {
    /// Render the commit message for a file base name
    pub fn commit_message(&self, file_name: &str) -> String {
        self.commit_message_template.replace("{file}", file_name)
    }
}

/// Configuration for comment synthesis
///
/// # Providers
/// - `openai` (default): any OpenAI-compatible chat completions API, uses OPENAI_API_KEY env var
/// - `mock`: Deterministic provider for testing and dry runs
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider type: "openai" (default), "mock"
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    /// Model name to use
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API base URL
    #[serde(default = "default_llm_api_base_url")]
    pub api_base_url: String,

    /// API key for authentication (or use OPENAI_API_KEY env var)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for transient synthesis failures
    #[serde(default = "default_llm_retry_attempts")]
    pub retry_attempts: usize,

    /// Completion token limit
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            model: default_llm_model(),
            api_base_url: default_llm_api_base_url(),
            api_key: None,
            timeout_secs: default_llm_timeout_secs(),
            retry_attempts: default_llm_retry_attempts(),
            max_tokens: default_llm_max_tokens(),
            temperature: default_llm_temperature(),
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***REDACTED***"))
            .field("timeout_secs", &self.timeout_secs)
            .field("retry_attempts", &self.retry_attempts)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl LlmConfig {
    /// API key from config, falling back to the OPENAI_API_KEY env var
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
    }
}

impl Config {
    /// Validates settings that every run depends on
    pub fn validate(&self) -> Result<()> {
        if !LLM_PROVIDERS.contains(&self.llm.provider.as_str()) {
            return Err(Error::config(format!(
                "Invalid LLM provider: '{}'. Valid providers: {}",
                self.llm.provider,
                LLM_PROVIDERS.join(", ")
            )));
        }

        if self.generator.synthesis_concurrency == 0 {
            return Err(Error::config(
                "generator.synthesis_concurrency must be greater than 0",
            ));
        }

        if !self.generator.commit_message_template.contains("{file}") {
            return Err(Error::config(
                "generator.commit_message_template must contain the {file} placeholder",
            ));
        }

        if self.generator.branch_prefix.trim().is_empty()
            || self.generator.branch_prefix.contains(char::is_whitespace)
        {
            return Err(Error::config(format!(
                "Invalid branch prefix: '{}'",
                self.generator.branch_prefix
            )));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(Error::config("llm.temperature must be between 0.0 and 2.0"));
        }

        if self.files.root_directory.trim().is_empty() {
            return Err(Error::config("files.root_directory must not be empty"));
        }

        Ok(())
    }

    /// Validates the settings needed to talk to the repository host
    pub fn validate_for_publishing(&self) -> Result<()> {
        self.validate()?;

        if self.repository.owner.is_empty() || self.repository.name.is_empty() {
            return Err(Error::config(
                "repository.owner and repository.name are required (or set GITHUB_REPOSITORY=owner/name)",
            ));
        }

        if self.repository.resolve_token().is_none() {
            return Err(Error::config(
                "Repository token required. Set repository.token or GITHUB_TOKEN env var",
            ));
        }

        if self.llm.provider == "openai" && self.llm.resolve_api_key().is_none() {
            return Err(Error::config(
                "OpenAI API key required. Set llm.api_key or OPENAI_API_KEY env var",
            ));
        }

        Ok(())
    }

    /// Serializes the configuration as TOML, with secrets removed
    pub fn to_toml_string(&self) -> Result<String> {
        let mut redacted = self.clone();
        redacted.repository.token = None;
        redacted.llm.api_key = None;
        toml::to_string_pretty(&redacted)
            .map_err(|e| Error::config(format!("Failed to serialize config: {e}")))
    }
}
