//! Resilient JSON extraction from free-form model output.
//!
//! Model responses are not guaranteed to be bare JSON even when the prompt
//! demands it. The extractor tries a sequence of strategies, first success
//! wins: direct parse, fenced code block, then the first top-level `{...}`
//! span in the text.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonExtractionError {
    #[error("No parseable JSON object found in model output")]
    NoJsonFound,

    #[error("Extracted JSON did not match the expected shape: {0}")]
    Shape(#[from] serde_json::Error),
}

/// Decodes a JSON object from `text`, tolerating prose wrapping and markdown
/// fences. Fails only if every strategy fails.
pub fn extract_json(text: &str) -> Result<Value, JsonExtractionError> {
    let text = text.trim();

    // Strategy 1: the model complied exactly.
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Ok(value);
    }

    // Strategy 2: JSON wrapped in a ``` or ```json fence, possibly with
    // surrounding prose.
    if let Some(interior) = fenced_block(text) {
        if let Ok(value) = serde_json::from_str::<Value>(interior) {
            return Ok(value);
        }
    }

    // Strategy 3: greedy brace span — first `{` to last `}`.
    if let Some(span) = brace_span(text) {
        if let Ok(value) = serde_json::from_str::<Value>(span) {
            return Ok(value);
        }
    }

    Err(JsonExtractionError::NoJsonFound)
}

/// Typed variant: extracts the JSON object, then deserializes it as `T`.
pub fn extract_json_as<T: DeserializeOwned>(text: &str) -> Result<T, JsonExtractionError> {
    let value = extract_json(text)?;
    Ok(serde_json::from_value(value)?)
}

/// Returns the interior of the first fenced code block, tolerating an
/// optional `json` language tag.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_ticks = &text[start + 3..];
    let body = after_ticks
        .strip_prefix("json")
        .unwrap_or(after_ticks)
        .trim_start();
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// Returns the span from the first `{` to the last `}`, if both exist in order.
fn brace_span(text: &str) -> Option<&str> {
    let open = text.find('{')?;
    let close = text.rfind('}')?;
    if close < open {
        return None;
    }
    Some(&text[open..=close])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_direct_json() {
        let value = extract_json(r#"{"matchPercentage": 85}"#).unwrap();
        assert_eq!(value, json!({"matchPercentage": 85}));
    }

    #[test]
    fn test_extract_round_trips_serialized_value() {
        let original = json!({
            "skills": ["Rust", "Tokio"],
            "nested": {"score": 42.5, "ok": true},
            "nothing": null
        });
        let text = serde_json::to_string(&original).unwrap();
        assert_eq!(extract_json(&text).unwrap(), original);
    }

    #[test]
    fn test_extract_from_fenced_block_with_tag() {
        let text = "Here is the result:\n```json\n{\"score\": 10}\n```\nHope that helps!";
        assert_eq!(extract_json(text).unwrap(), json!({"score": 10}));
    }

    #[test]
    fn test_extract_from_fenced_block_without_tag() {
        let text = "```\n{\"score\": 10}\n```";
        assert_eq!(extract_json(text).unwrap(), json!({"score": 10}));
    }

    #[test]
    fn test_extract_from_brace_span_with_prose() {
        let text = "Sure! The object is {\"a\": [1, 2], \"b\": \"x\"} as requested.";
        assert_eq!(extract_json(text).unwrap(), json!({"a": [1, 2], "b": "x"}));
    }

    #[test]
    fn test_extract_fails_on_plain_prose() {
        let err = extract_json("I could not produce any structured output.").unwrap_err();
        assert!(matches!(err, JsonExtractionError::NoJsonFound));
    }

    #[test]
    fn test_extract_json_as_typed() {
        #[derive(serde::Deserialize)]
        struct Score {
            score: u32,
        }
        let score: Score = extract_json_as("```json\n{\"score\": 7}\n```").unwrap();
        assert_eq!(score.score, 7);
    }

    #[test]
    fn test_extract_json_as_wrong_shape_is_shape_error() {
        #[derive(Debug, serde::Deserialize)]
        struct Score {
            #[allow(dead_code)]
            score: u32,
        }
        let err = extract_json_as::<Score>(r#"{"score": "not a number"}"#).unwrap_err();
        assert!(matches!(err, JsonExtractionError::Shape(_)));
    }
}
