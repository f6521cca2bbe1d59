//! Path exclusion rules from the `[files]` configuration

use glob::Pattern;
use std::collections::HashSet;
use std::path::{Component, Path};
use tracing::trace;
use tsdocbot_core::config::FilesConfig;
use tsdocbot_core::error::{Error, Result};

/// Decides which repository-relative paths are never documented
///
/// By default, excludes nothing.
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    /// Directory names excluded wherever they appear
    excluded_dirs: HashSet<String>,
    /// Normalized file paths, matched as path suffixes
    excluded_files: Vec<String>,
    patterns: Vec<Pattern>,
}

impl ExclusionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the filter from configuration
    pub fn from_config(config: &FilesConfig) -> Result<Self> {
        let patterns = config
            .exclude_patterns
            .iter()
            .map(|p| {
                Pattern::new(p)
                    .map_err(|e| Error::config(format!("Invalid exclude pattern '{p}': {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            excluded_dirs: config.excluded_directories.iter().cloned().collect(),
            excluded_files: config
                .excluded_files
                .iter()
                .map(|f| normalize(f))
                .filter(|f| !f.is_empty())
                .collect(),
            patterns,
        })
    }

    /// Check if a repository-relative path should be skipped
    pub fn is_excluded(&self, path: &Path) -> bool {
        let normalized = normalize_path(path);

        // Every component but the file name
        let mut directories = path.components().rev().skip(1);
        if directories.any(|c| match c {
            Component::Normal(name) => self.excluded_dirs.contains(name.to_string_lossy().as_ref()),
            _ => false,
        }) {
            trace!("Excluding {normalized}: excluded directory");
            return true;
        }

        if self
            .excluded_files
            .iter()
            .any(|file| normalized == *file || normalized.ends_with(&format!("/{file}")))
        {
            trace!("Excluding {normalized}: excluded file");
            return true;
        }

        if self.patterns.iter().any(|p| p.matches(&normalized)) {
            trace!("Excluding {normalized}: matches exclude pattern");
            return true;
        }

        false
    }
}

/// Forward-slash form of a relative path, without `./` prefixes
pub fn normalize_path(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    parts.join("/")
}

fn normalize(path: &str) -> String {
    normalize_path(Path::new(&path.replace('\\', "/")))
}

/// Whether `path` lies under the configured root directory
pub fn is_within_root(path: &Path, root_directory: &str) -> bool {
    let root = normalize(root_directory);
    if root.is_empty() {
        return true;
    }
    let normalized = normalize_path(path);
    normalized == root || normalized.starts_with(&format!("{root}/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(dirs: &[&str], files: &[&str], patterns: &[&str]) -> ExclusionFilter {
        let config = FilesConfig {
            excluded_directories: dirs.iter().map(|s| s.to_string()).collect(),
            excluded_files: files.iter().map(|s| s.to_string()).collect(),
            exclude_patterns: patterns.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        ExclusionFilter::from_config(&config).expect("Failed to build filter")
    }

    #[test]
    fn test_default_excludes_nothing() {
        assert!(!ExclusionFilter::new().is_excluded(Path::new("node_modules/x/index.ts")));
    }

    #[test]
    fn test_excluded_directories_match_components() {
        let filter = filter(&["node_modules", "dist"], &[], &[]);
        assert!(filter.is_excluded(Path::new("node_modules/pkg/index.ts")));
        assert!(filter.is_excluded(Path::new("packages/core/dist/index.ts")));
        assert!(!filter.is_excluded(Path::new("src/distance.ts")));
        assert!(!filter.is_excluded(Path::new("src/dist")));
    }

    #[test]
    fn test_excluded_files_match_suffix() {
        let filter = filter(&[], &["index.ts", "./src/generated.ts"], &[]);
        assert!(filter.is_excluded(Path::new("index.ts")));
        assert!(filter.is_excluded(Path::new("packages/core/index.ts")));
        assert!(filter.is_excluded(Path::new("src/generated.ts")));
        assert!(!filter.is_excluded(Path::new("src/reindex.ts")));
    }

    #[test]
    fn test_glob_patterns() {
        let filter = filter(&[], &[], &["**/*.test.ts", "scripts/*"]);
        assert!(filter.is_excluded(Path::new("src/wallet.test.ts")));
        assert!(filter.is_excluded(Path::new("scripts/release.ts")));
        assert!(!filter.is_excluded(Path::new("src/wallet.ts")));
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let config = FilesConfig {
            exclude_patterns: vec!["[".to_string()],
            ..Default::default()
        };
        assert!(ExclusionFilter::from_config(&config).is_err());
    }

    #[test]
    fn test_is_within_root() {
        assert!(is_within_root(Path::new("src/a.ts"), "."));
        assert!(is_within_root(Path::new("src/a.ts"), "./src/"));
        assert!(is_within_root(Path::new("src/nested/a.ts"), "src"));
        assert!(!is_within_root(Path::new("srcs/a.ts"), "src"));
        assert!(!is_within_root(Path::new("lib/a.ts"), "src"));
    }
}
