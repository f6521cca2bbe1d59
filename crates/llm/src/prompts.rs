//! Prompt builders for comment and pull request synthesis

use crate::json::extract_json_object;
use serde::Deserialize;
use tsdocbot_core::{DeclarationKind, DocWorkItem};

/// Prompt for one missing comment
///
/// Functions and methods are described by their own source text only.
/// Classes are described by name and public method names, never by
/// method bodies.
pub fn comment_prompt(item: &DocWorkItem) -> String {
    match item.kind {
        DeclarationKind::Function | DeclarationKind::Method => callable_prompt(item),
        DeclarationKind::Class => class_prompt(item),
    }
}

fn callable_prompt(item: &DocWorkItem) -> String {
    let label = match item.kind {
        DeclarationKind::Method => "method",
        _ => "function",
    };
    let name = item.display_name();

    let mut prompt = format!("Generate a JSDoc comment for the following TypeScript {label}.\n");
    prompt.push_str(&format!("Name: {name}\n"));
    prompt.push_str(&format!("Parameters: {}\n", item.params.join(", ")));
    prompt.push_str(&format!(
        "Returns: {}\n",
        item.return_type.as_deref().unwrap_or("void")
    ));
    prompt.push_str("\n```typescript\n");
    prompt.push_str(&item.source_text);
    prompt.push_str("\n```\n\n");
    prompt.push_str(
        "Describe what it does in one or two sentences, then add an @param tag for every \
         parameter and an @returns tag unless it returns void.\n",
    );
    prompt.push_str(RESPONSE_RULES);
    prompt
}

fn class_prompt(item: &DocWorkItem) -> String {
    let name = item.member_name.as_deref().unwrap_or("<anonymous>");

    let mut prompt = "Generate a JSDoc comment for the following TypeScript class.\n".to_string();
    prompt.push_str(&format!("Class name: {name}\n"));
    if item.method_names.is_empty() {
        prompt.push_str("Public methods: none\n");
    } else {
        prompt.push_str(&format!("Public methods: {}\n", item.method_names.join(", ")));
    }
    prompt.push_str("\nDescribe the responsibility of the class in one to three sentences.\n");
    prompt.push_str(RESPONSE_RULES);
    prompt
}

const RESPONSE_RULES: &str = "Respond with the comment text only: no /** or */ delimiters, \
no leading asterisks and no code fences.";

/// What the pull request prompt knows about the run
#[derive(Debug, Clone, Default)]
pub struct PullRequestContext<'a> {
    /// Change-set the run documented; `None` for a full scan
    pub pull_number: Option<u64>,
    pub head_commit: Option<&'a str>,
    pub files: &'a [String],
    pub comments_added: usize,
}

/// Title and body of the documentation pull request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequestContent {
    pub title: String,
    pub body: String,
}

pub fn pull_request_prompt(context: &PullRequestContext<'_>) -> String {
    let mut prompt = "Write a pull request title and description for an automated change \
that adds JSDoc comments to TypeScript code.\n\n"
        .to_string();

    match context.pull_number {
        Some(number) => prompt.push_str(&format!("Triggered by: pull request #{number}\n")),
        None => prompt.push_str("Triggered by: full repository scan\n"),
    }
    if let Some(commit) = context.head_commit {
        prompt.push_str(&format!("Base commit: {commit}\n"));
    }
    prompt.push_str(&format!("Comments added: {}\n", context.comments_added));
    prompt.push_str("Modified files:\n");
    for file in context.files {
        prompt.push_str(&format!("- {file}\n"));
    }

    prompt.push_str(
        "\nRespond with a JSON object of the form {\"title\": \"...\", \"body\": \"...\"}. \
         The body is GitHub markdown and must mention every modified file.\n",
    );
    prompt
}

/// Parse a pull request response; `None` when it lacks a usable title and body
pub fn parse_pull_request_content(response: &str) -> Option<PullRequestContent> {
    let json = extract_json_object(response)?;
    let content: PullRequestContent = serde_json::from_str(json).ok()?;
    let title = content.title.trim();
    let body = content.body.trim();
    if title.is_empty() || body.is_empty() {
        return None;
    }
    Some(PullRequestContent {
        title: title.to_string(),
        body: body.to_string(),
    })
}
