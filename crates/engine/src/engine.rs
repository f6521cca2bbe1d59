//! Documentation run orchestration
//!
//! One [`DocEngine::generate`] call walks a linear state machine:
//! collect missing documentation from every target file, synthesize the
//! queued comments, splice them in with per-file running offsets, then
//! publish the modified files on a fresh branch and open a pull request.

use crate::exclusion::{is_within_root, normalize_path, ExclusionFilter};
use crate::file_state::FileState;
use crate::lister::FileLister;
use crate::publish::{branch_name, pull_request_content};
use crate::scanner::Scanner;
use crate::workspace::head_commit;
use chrono::Utc;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tsdocbot_core::config::Config;
use tsdocbot_core::error::{Error, Result};
use tsdocbot_core::{DocWorkItem, ExistingDocIndex};
use tsdocbot_github::{FileStatus, PullRequestRef, PullRequestSpec, RepositoryHost};
use tsdocbot_languages::{is_typescript_file, SourceParser};
use tsdocbot_llm::prompts::comment_prompt;
use tsdocbot_llm::{format_doc_comment, CommentSynthesizer, PullRequestContext};

/// Stage of a documentation run. Runs only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Collecting,
    Queued,
    Publishing,
    Done,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Collecting => "collecting",
            Self::Queued => "queued",
            Self::Publishing => "publishing",
            Self::Done => "done",
        };
        f.write_str(label)
    }
}

/// Outcome of one [`DocEngine::generate`] call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub state: RunState,
    pub pull_number: Option<u64>,
    pub files_scanned: usize,
    /// Files that could not be read or parsed
    pub files_skipped: usize,
    pub existing_docs: usize,
    pub comments_generated: usize,
    pub modified_files: Vec<String>,
    /// Documentation branch, when one was created
    pub branch: Option<String>,
    pub pull_request: Option<PullRequestRef>,
    pub processing_time_ms: u64,
}

impl RunReport {
    fn new(pull_number: Option<u64>) -> Self {
        Self {
            state: RunState::Idle,
            pull_number,
            files_scanned: 0,
            files_skipped: 0,
            existing_docs: 0,
            comments_generated: 0,
            modified_files: Vec::new(),
            branch: None,
            pull_request: None,
            processing_time_ms: 0,
        }
    }
}

/// A file selected for scanning
#[derive(Debug, Clone, PartialEq, Eq)]
struct TargetFile {
    /// Repository-relative path
    path: PathBuf,
    /// Set for files that only exist on the host (added by the pull request)
    remote_ref: Option<String>,
}

/// Drives documentation runs against one repository
pub struct DocEngine {
    config: Config,
    repo_root: PathBuf,
    lister: Arc<dyn FileLister>,
    synthesizer: Arc<dyn CommentSynthesizer>,
    host: Arc<dyn RepositoryHost>,
    scanner: Scanner,
    filter: ExclusionFilter,
    state: RunState,
    existing_docs: ExistingDocIndex,
    /// Per-run file snapshots, reset at the start of every run
    files: HashMap<PathBuf, FileState>,
}

impl DocEngine {
    pub fn new(
        config: Config,
        repo_root: impl Into<PathBuf>,
        lister: Arc<dyn FileLister>,
        synthesizer: Arc<dyn CommentSynthesizer>,
        host: Arc<dyn RepositoryHost>,
    ) -> Result<Self> {
        config.validate()?;
        let filter = ExclusionFilter::from_config(&config.files)?;

        Ok(Self {
            config,
            repo_root: repo_root.into(),
            lister,
            synthesizer,
            host,
            scanner: Scanner::default(),
            filter,
            state: RunState::Idle,
            existing_docs: ExistingDocIndex::new(),
            files: HashMap::new(),
        })
    }

    /// Use a different parser
    pub fn with_parser(mut self, parser: Arc<dyn SourceParser>) -> Self {
        self.scanner = Scanner::new(parser);
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Comments found attached to declarations during the last run
    pub fn existing_docs(&self) -> &ExistingDocIndex {
        &self.existing_docs
    }

    /// Document the whole repository, or only the files of `pull_number`
    ///
    /// Nothing is published when no declaration is missing documentation.
    /// Every comment is synthesized before the branch is created, so a
    /// synthesis failure leaves the host untouched. A host failure aborts the
    /// run at the failing call.
    pub async fn generate(&mut self, pull_number: Option<u64>) -> Result<RunReport> {
        if pull_number == Some(0) {
            return Err(Error::invalid_input("Pull request numbers start at 1"));
        }
        let start_time = Instant::now();
        self.reset();
        let mut report = RunReport::new(pull_number);

        self.state = RunState::Collecting;
        match pull_number {
            Some(number) => info!("Starting documentation run for pull request #{number}"),
            None => info!("Starting documentation run for {}", self.repo_root.display()),
        }

        let targets = self.resolve_targets(pull_number).await?;
        info!("Found {} files to scan", targets.len());

        let mut queue = Vec::new();
        let mut scan_order = Vec::new();
        for target in &targets {
            let Some(content) = self.load(target).await? else {
                report.files_skipped += 1;
                continue;
            };
            let Some(analysis) = self.scanner.scan(&content, &target.path) else {
                report.files_skipped += 1;
                continue;
            };
            report.files_scanned += 1;

            for doc in &analysis.existing {
                self.existing_docs.record(doc);
            }
            report.existing_docs += analysis.existing.len();

            if !analysis.missing.is_empty() {
                self.files
                    .insert(target.path.clone(), FileState::new(content));
                scan_order.push(target.path.clone());
                queue.extend(analysis.missing);
            }
        }

        self.state = RunState::Queued;
        if queue.is_empty() {
            info!(
                "No missing documentation in {} files, nothing to publish",
                report.files_scanned
            );
            return Ok(self.finish(report, start_time));
        }
        info!(
            "Queued {} declarations in {} files",
            queue.len(),
            scan_order.len()
        );

        self.state = RunState::Publishing;
        let comments = self.synthesize_all(&queue).await?;
        for (item, comment) in queue.iter_mut().zip(comments) {
            item.generated = Some(comment);
        }
        report.comments_generated = queue.len();

        let branch = branch_name(
            &self.config.generator.branch_prefix,
            pull_number,
            Utc::now(),
        );
        self.host
            .create_branch(&branch, &self.config.repository.base_branch)
            .await?;
        info!("Created branch {branch}");
        report.branch = Some(branch.clone());

        self.apply(&queue, &scan_order);

        for path in &scan_order {
            let Some(state) = self.files.get(path).filter(|s| s.is_modified()) else {
                continue;
            };
            let relative = normalize_path(path);
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| relative.clone());
            let message = self.config.generator.commit_message(&file_name);

            self.host
                .commit_file(&branch, &relative, state.content(), &message)
                .await?;
            debug!("Committed {relative}");
            report.modified_files.push(relative);
        }

        let head = head_commit(&self.repo_root);
        let context = PullRequestContext {
            pull_number,
            head_commit: head.as_deref(),
            files: &report.modified_files,
            comments_added: report.comments_generated,
        };
        let content = pull_request_content(self.synthesizer.as_ref(), &context).await;

        let spec = PullRequestSpec {
            title: content.title,
            body: content.body,
            head: branch,
            base: self.config.repository.base_branch.clone(),
            labels: self.config.generator.pull_request_labels.clone(),
            reviewers: self.config.generator.pull_request_reviewers.clone(),
        };
        let pull_request = self.host.create_pull_request(&spec).await?;
        info!("Opened pull request #{}: {}", pull_request.number, pull_request.url);
        report.pull_request = Some(pull_request);

        Ok(self.finish(report, start_time))
    }

    fn reset(&mut self) {
        self.state = RunState::Idle;
        self.existing_docs.clear();
        self.files.clear();
    }

    fn finish(&mut self, mut report: RunReport, start_time: Instant) -> RunReport {
        self.state = RunState::Done;
        report.state = RunState::Done;
        report.processing_time_ms = start_time.elapsed().as_millis() as u64;
        info!(
            "Documentation run finished: {} files scanned, {} comments added in {:.2}s",
            report.files_scanned,
            report.comments_generated,
            report.processing_time_ms as f64 / 1000.0
        );
        report
    }

    /// Files to scan, in a deterministic order
    async fn resolve_targets(&self, pull_number: Option<u64>) -> Result<Vec<TargetFile>> {
        let Some(number) = pull_number else {
            let files = self.lister.list_files()?;
            return Ok(files
                .into_iter()
                .map(|path| TargetFile {
                    path,
                    remote_ref: None,
                })
                .collect());
        };

        let changes = self.host.get_changed_files(number).await?;
        debug!("Pull request #{number} changes {} files", changes.len());

        let mut seen = HashSet::new();
        let mut targets = Vec::new();
        for change in changes {
            if change.status == FileStatus::Deleted {
                continue;
            }
            let path = PathBuf::from(&change.path);
            if !is_typescript_file(&path)
                || !is_within_root(&path, &self.config.files.root_directory)
                || self.filter.is_excluded(&path)
            {
                debug!("Ignoring changed file {}", change.path);
                continue;
            }
            if !seen.insert(path.clone()) {
                continue;
            }

            let remote_ref = change
                .is_new
                .then(|| change.contents_ref.clone().unwrap_or_else(|| change.path.clone()));
            targets.push(TargetFile { path, remote_ref });
        }
        Ok(targets)
    }

    /// Content of a target; `None` when a local file cannot be read
    async fn load(&self, target: &TargetFile) -> Result<Option<String>> {
        if let Some(remote_ref) = &target.remote_ref {
            let content = self.host.fetch_remote_file_content(remote_ref).await?;
            return Ok(Some(content));
        }

        let full_path = self.repo_root.join(&target.path);
        match tokio::fs::read_to_string(&full_path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) => {
                warn!("Skipping {}: failed to read file: {e}", target.path.display());
                Ok(None)
            }
        }
    }

    /// Synthesize and format a comment for every queued item, in queue order
    ///
    /// Any failure aborts the whole batch.
    async fn synthesize_all(&self, queue: &[DocWorkItem]) -> Result<Vec<String>> {
        let synthesizer = self.synthesizer.as_ref();
        let concurrency = self.config.generator.synthesis_concurrency.max(1);

        stream::iter(queue)
            .map(move |item| async move {
                let raw = synthesizer
                    .synthesize(&comment_prompt(item))
                    .await
                    .inspect_err(|e| {
                        error!(
                            "Failed to synthesize documentation for {} in {}: {e}",
                            item.display_name(),
                            item.file_path.display()
                        )
                    })?;
                debug!("Synthesized documentation for {}", item.display_name());
                format_doc_comment(&raw, &item.indent)
            })
            .buffered(concurrency)
            .try_collect()
            .await
    }

    /// Splice resolved comments into their files, ascending by original line
    fn apply(&mut self, queue: &[DocWorkItem], scan_order: &[PathBuf]) {
        for path in scan_order {
            let Some(state) = self.files.get_mut(path) else {
                continue;
            };
            let mut items: Vec<&DocWorkItem> = queue
                .iter()
                .filter(|item| item.file_path == *path)
                .collect();
            items.sort_by_key(|item| item.start_line);

            for item in items {
                let Some(comment) = &item.generated else {
                    continue;
                };
                let line = state.splice(item.start_line, comment);
                debug!(
                    "Inserted documentation for {} at {}:{line}",
                    item.display_name(),
                    path.display()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_state_display() {
        assert_eq!(RunState::Idle.to_string(), "idle");
        assert_eq!(RunState::Publishing.to_string(), "publishing");
    }

    #[test]
    fn test_run_state_serialization() {
        let json = serde_json::to_string(&RunState::Queued).expect("Failed to serialize");
        assert_eq!(json, "\"queued\"");
    }
}
