//! Pulling structured output out of free-form model responses

/// Strip a surrounding markdown code fence, if the response is fenced
pub fn strip_markdown_fences(response: &str) -> &str {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    // Skip the opening fence line, which may carry a language tag
    let after_fence = match trimmed.find('\n') {
        Some(newline_pos) => &trimmed[newline_pos + 1..],
        None => trimmed.trim_start_matches('`'),
    };

    match after_fence.rfind("```") {
        Some(close_pos) => after_fence[..close_pos].trim(),
        None => after_fence.trim(),
    }
}

/// Balanced `{...}` starting at byte offset `start`, respecting string literals
fn balanced_object_at(content: &str, start: usize) -> Option<&str> {
    let candidate = content.get(start..)?;
    if !candidate.starts_with('{') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in candidate.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&candidate[..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Extract the first valid JSON object from an LLM response
///
/// Handles markdown fences, chatty prefixes and trailing explanations.
pub fn extract_json_object(response: &str) -> Option<&str> {
    let content = strip_markdown_fences(response);

    content
        .match_indices('{')
        .filter_map(|(pos, _)| balanced_object_at(content, pos))
        .find(|json| serde_json::from_str::<serde_json::Value>(json).is_ok())
}
