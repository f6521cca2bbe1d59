//! Branch naming and pull request text

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use tracing::{debug, warn};
use tsdocbot_llm::prompts::{parse_pull_request_content, pull_request_prompt};
use tsdocbot_llm::{CommentSynthesizer, PullRequestContent, PullRequestContext};

/// `<prefix>-<pr-N | full>-<YYYYmmddHHMMSS>`
pub fn branch_name(prefix: &str, pull_number: Option<u64>, now: DateTime<Utc>) -> String {
    let scope = match pull_number {
        Some(number) => format!("pr-{number}"),
        None => "full".to_string(),
    };
    format!("{prefix}-{scope}-{}", now.format("%Y%m%d%H%M%S"))
}

/// Deterministic pull request text listing every modified file once
pub fn default_pull_request_content(
    files: &[String],
    pull_number: Option<u64>,
) -> PullRequestContent {
    let title = match pull_number {
        Some(number) => format!("docs: add JSDoc comments for #{number}"),
        None => "docs: add missing JSDoc comments".to_string(),
    };

    let unique: BTreeSet<&str> = files.iter().map(String::as_str).collect();
    let mut body = String::from(
        "This pull request adds JSDoc comments to declarations that were missing documentation.\n\n",
    );
    body.push_str("### Modified files\n\n");
    for file in unique {
        body.push_str(&format!("- `{file}`\n"));
    }

    PullRequestContent { title, body }
}

/// Ask the synthesizer for pull request text, falling back to the default
///
/// Never fails: a synthesis error or an unusable response both yield
/// [`default_pull_request_content`].
pub async fn pull_request_content(
    synthesizer: &dyn CommentSynthesizer,
    context: &PullRequestContext<'_>,
) -> PullRequestContent {
    let prompt = pull_request_prompt(context);
    match synthesizer.synthesize(&prompt).await {
        Ok(response) => match parse_pull_request_content(&response) {
            Some(content) => {
                debug!("Using synthesized pull request title: {}", content.title);
                content
            }
            None => {
                warn!("Pull request response was not a usable JSON object, using default text");
                default_pull_request_content(context.files, context.pull_number)
            }
        },
        Err(e) => {
            warn!("Failed to synthesize pull request text: {e}. Using default text");
            default_pull_request_content(context.files, context.pull_number)
        }
    }
}
