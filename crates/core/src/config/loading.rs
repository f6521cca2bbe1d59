//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, Environment, File, FileFormat};
use std::path::Path;

use super::{Config, CONFIG_FILE_NAME};

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `TSDOCBOT_` and use double underscores
    /// for nested values. For example:
    /// - `TSDOCBOT_LLM__MODEL=gpt-4o`
    ///
    /// The GitHub Actions variables `GITHUB_REPOSITORY`, `INPUT_PULL_NUMBER` and
    /// `INPUT_ROOT_DIRECTORY` are honored as well.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut builder = ConfigLib::builder();

        // Add the config file if it exists
        if path.exists() {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        // Add environment variables with TSDOCBOT_ prefix
        builder = builder.add_source(
            Environment::with_prefix("TSDOCBOT")
                .separator("__")
                .try_parsing(true),
        );

        // Support GitHub Actions environment variables
        if let Ok(repository) = std::env::var("GITHUB_REPOSITORY") {
            if let Some((owner, name)) = repository.split_once('/') {
                builder = builder
                    .set_override("repository.owner", owner)
                    .map_err(|e| Error::config(format!("Failed to set repository owner: {e}")))?
                    .set_override("repository.name", name)
                    .map_err(|e| Error::config(format!("Failed to set repository name: {e}")))?;
            }
        }
        if let Ok(pull_number) = std::env::var("INPUT_PULL_NUMBER") {
            if let Ok(number) = pull_number.trim().parse::<i64>() {
                builder = builder
                    .set_override("repository.pull_number", number)
                    .map_err(|e| Error::config(format!("Failed to set INPUT_PULL_NUMBER: {e}")))?;
            }
        }
        if let Ok(root) = std::env::var("INPUT_ROOT_DIRECTORY") {
            if !root.trim().is_empty() {
                builder = builder
                    .set_override("files.root_directory", root)
                    .map_err(|e| {
                        Error::config(format!("Failed to set INPUT_ROOT_DIRECTORY: {e}"))
                    })?;
            }
        }

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration for a repository
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (`<repo_root>/.tsdocbot.toml` or custom --config path)
    /// 3. Environment variables (TSDOCBOT_*, then GitHub Actions variables)
    pub fn load(config_path: Option<&Path>, repo_root: &Path) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => repo_root.join(CONFIG_FILE_NAME),
        };
        Self::from_file(&path)
    }
}
