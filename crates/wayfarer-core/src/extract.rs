//! Structured-payload extraction from free-form model output.
//!
//! Models are instructed to answer with JSON only, but in practice the
//! payload often arrives wrapped in prose or code fences. This module
//! locates the first balanced JSON object or array by walking the text
//! and tracking delimiter depth (skipping quoted strings and escapes),
//! then hands the balanced slice to `serde_json`.

use serde_json::Value;

use crate::error::Error;

/// Extract and parse the first balanced JSON value embedded in `text`.
///
/// Fails with [`Error::Extraction`] when no opening delimiter exists or
/// when the located slice is unbalanced or not valid JSON. Most callers
/// require structured output to proceed, so this strict policy is the
/// default.
pub fn extract_first_json(text: &str) -> Result<Value, Error> {
    let slice = first_balanced_slice(text)
        .ok_or_else(|| Error::Extraction(snippet(text)))?;

    serde_json::from_str(slice).map_err(|e| Error::Extraction(format!("{e}: {}", snippet(slice))))
}

/// Like [`extract_first_json`], but a response with no JSON payload at
/// all yields an empty array instead of an error. Used where structured
/// output is an enhancement rather than a requirement (menu
/// recommendations); a present-but-malformed payload still fails.
pub fn extract_first_json_or_empty(text: &str) -> Result<Value, Error> {
    match first_balanced_slice(text) {
        None => Ok(Value::Array(Vec::new())),
        Some(slice) => {
            serde_json::from_str(slice).map_err(|e| Error::Extraction(format!("{e}: {}", snippet(slice))))
        }
    }
}

/// Locate the first `{`...`}` or `[`...`]` region with balanced nesting.
///
/// Content inside string literals is ignored for depth tracking, so
/// braces embedded in values ("note": "use {placeholders}") do not
/// derail the scan. Returns `None` when no opening delimiter occurs or
/// the structure never closes.
fn first_balanced_slice(text: &str) -> Option<&str> {
    let open = text.find(['{', '['])?;
    let opener = text.as_bytes()[open];
    let closer = if opener == b'{' { b'}' } else { b']' };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in text.bytes().enumerate().skip(open) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            _ if b == opener => depth += 1,
            _ if b == closer => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[open..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Short prefix of the offending text for error messages.
fn snippet(text: &str) -> String {
    const MAX: usize = 120;
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(MAX).collect();
        format!("{cut}...")
    }
}
