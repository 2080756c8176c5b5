use serde_json::Value;

use crate::error::AgentError;

/// Pull the first JSON object out of raw oracle output.
///
/// Accepts a bare object, an object inside a fenced markdown block
/// (with or without a `json` tag), or an object embedded in prose.
pub fn extract_json(text: &str) -> Result<Value, AgentError> {
    let trimmed = text.trim();

    let candidates = std::iter::once(trimmed)
        .chain(fenced_blocks(trimmed))
        .chain(balanced_objects(trimmed));

    for candidate in candidates {
        if !candidate.starts_with('{') {
            continue;
        }
        if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(candidate) {
            return Ok(value);
        }
    }

    Err(AgentError::Parse(format!(
        "No valid JSON object found in response (length={})",
        text.len()
    )))
}

/// Bodies of ``` fenced blocks, info string stripped.
fn fenced_blocks(text: &str) -> impl Iterator<Item = &str> {
    text.split("```")
        .skip(1)
        .step_by(2)
        .map(|block| match block.split_once('\n') {
            Some((info, body)) if !info.trim_start().starts_with('{') => body.trim(),
            _ => block.trim(),
        })
}

/// Every top-level `{ ... }` span, skipping braces inside string literals.
fn balanced_objects(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    spans.push(&text[start..=i]);
                }
            }
            _ => {}
        }
    }

    spans
}
