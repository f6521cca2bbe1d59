//! Turning synthesized text into a ready-to-splice JSDoc block

use crate::json::strip_markdown_fences;
use tsdocbot_core::error::{Error, Result};

/// Comment body lines with any fences, delimiters and `*` gutters removed
///
/// Models frequently answer with a complete `/** ... */` block even when
/// asked for the body only; wrapping that again would nest comments.
pub fn normalize_comment_body(raw: &str) -> Vec<String> {
    let mut text = strip_markdown_fences(raw).trim();
    let had_delimiters = text.starts_with("/**");
    if let Some(rest) = text.strip_prefix("/**") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("*/") {
        text = rest;
    }

    let raw_lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let gutter = had_delimiters
        || raw_lines
            .iter()
            .filter(|line| !line.trim().is_empty())
            .all(|line| line.trim_start().starts_with('*'));

    let mut lines: Vec<String> = raw_lines
        .into_iter()
        .map(|line| {
            if !gutter {
                return line.to_string();
            }
            let stripped = line.trim_start();
            let stripped = stripped.strip_prefix('*').unwrap_or(stripped);
            stripped.strip_prefix(' ').unwrap_or(stripped).to_string()
        })
        .collect();

    while lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    lines
}

/// Wrap synthesized text as a JSDoc block indented to its declaration
///
/// The result has no trailing newline. Empty text is a synthesis failure.
/// A `*/` left inside the body is written as `*\/` so the block cannot
/// end early.
pub fn format_doc_comment(raw: &str, indent: &str) -> Result<String> {
    let lines = normalize_comment_body(raw);
    if lines.is_empty() {
        return Err(Error::synthesis("Synthesized comment is empty"));
    }

    let mut comment = format!("{indent}/**\n");
    for line in &lines {
        let line = line.replace("*/", "*\\/");
        if line.trim().is_empty() {
            comment.push_str(&format!("{indent} *\n"));
        } else {
            comment.push_str(&format!("{indent} * {line}\n"));
        }
    }
    comment.push_str(&format!("{indent} */"));
    Ok(comment)
}
