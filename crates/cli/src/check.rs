//! `tsdocbot check`: report missing documentation without publishing

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;
use tsdocbot_core::config::Config;
use tsdocbot_core::DeclarationKind;
use tsdocbot_engine::{FileLister, LocalFileLister, Scanner};

/// One declaration without documentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingDoc {
    pub line: usize,
    pub kind: DeclarationKind,
    pub name: String,
}

/// Documentation status of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileCheck {
    pub path: PathBuf,
    pub missing: Vec<MissingDoc>,
    pub documented: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub files: Vec<FileCheck>,
    /// Files that could not be read or parsed
    pub skipped: Vec<PathBuf>,
}

impl CheckReport {
    pub fn missing_count(&self) -> usize {
        self.files.iter().map(|f| f.missing.len()).sum()
    }

    pub fn documented_count(&self) -> usize {
        self.files.iter().map(|f| f.documented).sum()
    }
}

/// Analyze every eligible file under the configured root
pub fn check_repository(repo_root: &Path, config: &Config) -> Result<CheckReport> {
    let lister = LocalFileLister::new(repo_root, &config.files)?;
    let scanner = Scanner::default();
    let mut report = CheckReport::default();

    let files = lister.list_files().context("Failed to list files")?;
    for path in files {
        let content = match std::fs::read_to_string(repo_root.join(&path)) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read {}: {e}", path.display());
                report.skipped.push(path);
                continue;
            }
        };

        let Some(analysis) = scanner.scan(&content, &path) else {
            report.skipped.push(path);
            continue;
        };

        report.files.push(FileCheck {
            missing: analysis
                .missing
                .iter()
                .map(|item| MissingDoc {
                    line: item.start_line,
                    kind: item.kind,
                    name: item.display_name(),
                })
                .collect(),
            documented: analysis.existing.len(),
            path,
        });
    }

    Ok(report)
}
