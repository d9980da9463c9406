//! Turns a model's free-text reply into JSON.
//!
//! The completion endpoint is prompted to answer with a raw JSON object but
//! routinely wraps it in markdown fences or a sentence of prose. Recovery
//! strips the fences, cuts out the object and decodes it. Everything here is
//! pure so it can be exercised without a network.

use std::sync::OnceLock;

use log::debug;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::RecipeError;

/// Strategy for locating the JSON object inside the cleaned text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extraction {
    /// First `{` to last `}`, not nesting-aware
    #[default]
    Greedy,
    /// First complete top-level object, skipping braces inside strings
    Balanced,
}

fn opening_fence() -> &'static Regex {
    static OPENING: OnceLock<Regex> = OnceLock::new();
    OPENING.get_or_init(|| Regex::new(r"(?i)```json\s*").expect("valid fence pattern"))
}

fn closing_fence() -> &'static Regex {
    static CLOSING: OnceLock<Regex> = OnceLock::new();
    CLOSING.get_or_init(|| Regex::new(r"```\s*").expect("valid fence pattern"))
}

/// Remove every code-fence marker and trim the result
pub fn strip_fences(text: &str) -> String {
    let without_open = opening_fence().replace_all(text, "");
    closing_fence()
        .replace_all(&without_open, "")
        .trim()
        .to_string()
}

/// Slice from the first `{` to the last `}` inclusive.
///
/// Returns `None` when the text lacks either brace or they are out of order.
pub fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Slice covering the first complete top-level object.
///
/// Tracks string literals and escapes so braces inside values do not count.
pub fn extract_balanced(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
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
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Produce the text that will be handed to the JSON decoder.
///
/// When no object can be located the whole cleaned text is used, so a reply
/// that is already bare JSON still decodes.
pub fn candidate(text: &str, extraction: Extraction) -> String {
    let cleaned = strip_fences(text);
    let found = match extraction {
        Extraction::Greedy => extract_object(&cleaned),
        Extraction::Balanced => extract_balanced(&cleaned).or_else(|| extract_object(&cleaned)),
    };
    match found {
        Some(object) => object.to_string(),
        None => cleaned,
    }
}

/// Recover an untyped JSON value from a model reply
pub fn recover_value(text: &str, extraction: Extraction) -> Result<Value, RecipeError> {
    recover(text, extraction)
}

/// Recover and decode a model reply into `T`
pub fn recover<T: DeserializeOwned>(text: &str, extraction: Extraction) -> Result<T, RecipeError> {
    let candidate = candidate(text, extraction);
    debug!("Recovered {} characters of JSON candidate", candidate.len());

    serde_json::from_str(&candidate).map_err(|e| RecipeError::MalformedResponse {
        detail: e.to_string(),
    })
}
