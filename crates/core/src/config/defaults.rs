//! Default values and functions for configuration

// Default constants
pub(crate) const DEFAULT_BASE_BRANCH: &str = "main";
pub(crate) const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub(crate) const DEFAULT_ROOT_DIRECTORY: &str = ".";
pub(crate) const DEFAULT_BRANCH_PREFIX: &str = "docs-update";
pub(crate) const DEFAULT_COMMIT_MESSAGE_TEMPLATE: &str = "docs: add JSDoc comments to {file}";
pub(crate) const DEFAULT_LLM_PROVIDER: &str = "openai";
pub(crate) const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
pub(crate) const DEFAULT_LLM_API_BASE_URL: &str = "https://api.openai.com/v1";

/// File name of the per-repository configuration file
pub const CONFIG_FILE_NAME: &str = ".tsdocbot.toml";

pub(crate) fn default_base_branch() -> String {
    DEFAULT_BASE_BRANCH.to_string()
}

pub(crate) fn default_github_api_url() -> String {
    DEFAULT_GITHUB_API_URL.to_string()
}

pub(crate) fn default_host_timeout_secs() -> u64 {
    30
}

pub(crate) fn default_host_retry_attempts() -> usize {
    3
}

pub(crate) fn default_root_directory() -> String {
    DEFAULT_ROOT_DIRECTORY.to_string()
}

pub(crate) fn default_excluded_directories() -> Vec<String> {
    vec![
        "node_modules".to_string(),
        "dist".to_string(),
        "build".to_string(),
        "coverage".to_string(),
        ".git".to_string(),
    ]
}

pub(crate) fn default_max_file_size_bytes() -> u64 {
    1024 * 1024 // 1MB
}

pub(crate) fn default_branch_prefix() -> String {
    DEFAULT_BRANCH_PREFIX.to_string()
}

pub(crate) fn default_commit_message_template() -> String {
    DEFAULT_COMMIT_MESSAGE_TEMPLATE.to_string()
}

pub(crate) fn default_pull_request_labels() -> Vec<String> {
    vec!["documentation".to_string(), "automated-pr".to_string()]
}

pub(crate) fn default_synthesis_concurrency() -> usize {
    4
}

pub(crate) fn default_llm_provider() -> String {
    DEFAULT_LLM_PROVIDER.to_string()
}

pub(crate) fn default_llm_model() -> String {
    DEFAULT_LLM_MODEL.to_string()
}

pub(crate) fn default_llm_api_base_url() -> String {
    DEFAULT_LLM_API_BASE_URL.to_string()
}

pub(crate) fn default_llm_timeout_secs() -> u64 {
    60
}

pub(crate) fn default_llm_retry_attempts() -> usize {
    3
}

pub(crate) fn default_llm_max_tokens() -> u32 {
    1024
}

pub(crate) fn default_llm_temperature() -> f32 {
    0.2
}
