//! `tsdocbot init`: default configuration file

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;
use tsdocbot_core::config::{Config, CONFIG_FILE_NAME};

const HEADER: &str = "\
# tsdocbot configuration
#
# Secrets are read from the environment: GITHUB_TOKEN and OPENAI_API_KEY.
# Any value can be overridden with TSDOCBOT_<SECTION>__<KEY>, e.g.
# TSDOCBOT_LLM__MODEL=gpt-4o.

";

/// Write `.tsdocbot.toml` with default settings into `repo_root`
///
/// Returns the path written, or `None` when the file already exists.
pub fn write_default_config(repo_root: &Path) -> Result<Option<PathBuf>> {
    let path = repo_root.join(CONFIG_FILE_NAME);
    if path.exists() {
        info!("Configuration file already exists: {}", path.display());
        return Ok(None);
    }

    let body = Config::default().to_toml_string()?;
    std::fs::write(&path, format!("{HEADER}{body}"))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Created configuration file: {}", path.display());
    Ok(Some(path))
}
