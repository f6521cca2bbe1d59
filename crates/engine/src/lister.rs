//! Discovery of candidate TypeScript files in the local checkout

use crate::exclusion::{normalize_path, ExclusionFilter};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tsdocbot_core::config::FilesConfig;
use tsdocbot_core::error::{Error, Result};
use tsdocbot_languages::is_typescript_file;

/// Source of the files a full-repository run looks at
pub trait FileLister: Send + Sync {
    /// Repository-relative paths, in a deterministic order
    fn list_files(&self) -> Result<Vec<PathBuf>>;
}

/// Walks `<repo_root>/<root_directory>` honoring `.gitignore`
pub struct LocalFileLister {
    repo_root: PathBuf,
    root_directory: String,
    filter: ExclusionFilter,
    max_file_size: u64,
}

impl LocalFileLister {
    pub fn new(repo_root: &Path, config: &FilesConfig) -> Result<Self> {
        Ok(Self {
            repo_root: repo_root.to_path_buf(),
            root_directory: config.root_directory.clone(),
            filter: ExclusionFilter::from_config(config)?,
            max_file_size: config.max_file_size_bytes,
        })
    }

    /// Check if a file should be included
    fn should_include_file(&self, file_path: &Path) -> bool {
        // symlink_metadata so links are judged as links, never followed
        let metadata = match file_path.symlink_metadata() {
            Ok(m) => m,
            Err(_) => return false,
        };

        if metadata.is_symlink() {
            debug!("Excluding symlink: {}", file_path.display());
            return false;
        }

        if !metadata.is_file() {
            return false;
        }

        if metadata.len() > self.max_file_size {
            debug!(
                "Excluding large file: {} (size: {} bytes)",
                file_path.display(),
                metadata.len()
            );
            return false;
        }

        true
    }
}

impl FileLister for LocalFileLister {
    fn list_files(&self) -> Result<Vec<PathBuf>> {
        let root = normalize_path(Path::new(&self.root_directory));
        let scan_root = if root.is_empty() {
            self.repo_root.clone()
        } else {
            self.repo_root.join(root)
        };
        if !scan_root.is_dir() {
            return Err(Error::config(format!(
                "Root directory does not exist: {}",
                scan_root.display()
            )));
        }

        let walker = WalkBuilder::new(&scan_root)
            .standard_filters(true)
            .hidden(false)
            .parents(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .require_git(false)
            .filter_entry(|entry| entry.file_name() != ".git")
            .build();

        let mut files = Vec::new();
        for entry_result in walker {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Error walking {}: {e}", scan_root.display());
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) || !is_typescript_file(path) {
                continue;
            }

            let Ok(relative) = path.strip_prefix(&self.repo_root) else {
                continue;
            };
            if self.filter.is_excluded(relative) || !self.should_include_file(path) {
                continue;
            }
            files.push(relative.to_path_buf());
        }

        files.sort();
        debug!(
            "Found {} TypeScript files under {}",
            files.len(),
            scan_root.display()
        );
        Ok(files)
    }
}
