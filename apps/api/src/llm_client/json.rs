//! Tolerant extraction of JSON embedded in raw LLM completions.
//!
//! Models wrap JSON in markdown fences, prefix it with commentary, or emit
//! literal line breaks inside string values. `extract_json` locates the
//! payload, parses it, and on failure retries once after repairing string
//! literals. Every failure becomes a `MalformedResponse`.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Characters of raw text carried in a `MalformedResponse` for diagnostics.
const SNIPPET_CHARS: usize = 300;

/// The top-level JSON shape a prompt asked the model for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Object,
    Array,
}

impl JsonShape {
    fn delimiters(self) -> (char, char) {
        match self {
            JsonShape::Object => ('{', '}'),
            JsonShape::Array => ('[', ']'),
        }
    }

    /// Picks the shape whose opening bracket appears first in `text`.
    pub fn detect(text: &str) -> Option<JsonShape> {
        match (text.find('{'), text.find('[')) {
            (Some(o), Some(a)) if a < o => Some(JsonShape::Array),
            (Some(_), _) => Some(JsonShape::Object),
            (None, Some(_)) => Some(JsonShape::Array),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{reason}. Raw: {snippet}")]
pub struct MalformedResponse {
    pub reason: String,
    /// First characters of the raw completion.
    pub snippet: String,
}

impl MalformedResponse {
    fn new(reason: impl Into<String>, raw: &str) -> Self {
        Self {
            reason: reason.into(),
            snippet: raw.chars().take(SNIPPET_CHARS).collect(),
        }
    }
}

/// Extracts and parses the JSON value of the given shape from `raw`.
pub fn extract_json(raw: &str, shape: JsonShape) -> Result<Value, MalformedResponse> {
    let cleaned = strip_json_fences(raw);
    let (open, close) = shape.delimiters();

    let start = cleaned.find(open);
    let end = cleaned.rfind(close);
    let candidate = match (start, end) {
        (Some(start), Some(end)) if start < end => &cleaned[start..=end],
        _ => {
            return Err(MalformedResponse::new(
                format!("No JSON {} found in response", shape_name(shape)),
                raw,
            ))
        }
    };

    match serde_json::from_str(candidate) {
        Ok(value) => Ok(value),
        Err(first) => {
            debug!("JSON parse failed ({first}), retrying after string repair");
            serde_json::from_str(&repair_string_literals(candidate)).map_err(|e| {
                MalformedResponse::new(format!("Failed to parse JSON from model output: {e}"), raw)
            })
        }
    }
}

/// Extracts whichever JSON shape appears first in `raw`.
pub fn extract_any_json(raw: &str) -> Result<Value, MalformedResponse> {
    let cleaned = strip_json_fences(raw);
    let shape = JsonShape::detect(&cleaned)
        .ok_or_else(|| MalformedResponse::new("No JSON object or array found in response", raw))?;
    extract_json(raw, shape)
}

fn shape_name(shape: JsonShape) -> &'static str {
    match shape {
        JsonShape::Object => "object",
        JsonShape::Array => "array",
    }
}

/// Removes every ```json and ``` fence marker.
fn strip_json_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Escapes raw newlines and tabs inside string literals and drops carriage
/// returns. Text outside string literals is copied untouched. Applying this
/// to its own output is a no-op.
fn repair_string_literals(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if !in_string {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
            continue;
        }

        if escaped {
            escaped = false;
            out.push(c);
            continue;
        }

        match c {
            '\\' => {
                escaped = true;
                out.push(c);
            }
            '"' => {
                in_string = false;
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => {}
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fenced_object_matches_direct_parse() {
        let body = r#"{"score": {"overall": 82}, "strengths": ["Rust"]}"#;
        let raw = format!("```json\n{body}\n```");
        let direct: Value = serde_json::from_str(body).unwrap();
        assert_eq!(extract_json(&raw, JsonShape::Object).unwrap(), direct);
    }

    #[test]
    fn test_bare_fence_without_language_tag() {
        let raw = "```\n[{\"question\": \"Why Rust?\"}]\n```";
        let value = extract_json(raw, JsonShape::Array).unwrap();
        assert_eq!(value, json!([{"question": "Why Rust?"}]));
    }

    #[test]
    fn test_commentary_around_payload_is_ignored() {
        let raw = "Sure! Here is the analysis you asked for:\n{\"matchScore\": 71}\nHope this helps.";
        let value = extract_json(raw, JsonShape::Object).unwrap();
        assert_eq!(value["matchScore"], 71);
    }

    #[test]
    fn test_literal_newlines_in_strings_are_repaired() {
        let raw = "{\"about\": \"First paragraph.\nSecond paragraph.\tTabbed.\r\"}";
        let value = extract_json(raw, JsonShape::Object).unwrap();
        assert_eq!(value["about"], "First paragraph.\nSecond paragraph.\tTabbed.");
    }

    #[test]
    fn test_repair_is_idempotent() {
        let broken = "{\"body\": \"Hi there,\nThanks for your time.\", \"tip\": \"a\\\"b\"}";
        let once = repair_string_literals(broken);
        let twice = repair_string_literals(&once);
        assert_eq!(once, twice);
        let a: Value = serde_json::from_str(&once).unwrap();
        let b: Value = serde_json::from_str(&twice).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_repair_leaves_structural_whitespace_alone() {
        let text = "{\n  \"a\": \"x\ny\"\n}";
        assert_eq!(repair_string_literals(text), "{\n  \"a\": \"x\\ny\"\n}");
    }

    #[test]
    fn test_no_brackets_is_malformed() {
        let err = extract_json("I cannot help with that.", JsonShape::Object).unwrap_err();
        assert!(err.reason.contains("No JSON object"));
        assert_eq!(err.snippet, "I cannot help with that.");
    }

    #[test]
    fn test_closing_before_opening_is_malformed() {
        let err = extract_json("} oops {", JsonShape::Object).unwrap_err();
        assert!(err.reason.contains("No JSON object"));
    }

    #[test]
    fn test_unrepairable_json_is_malformed_with_snippet() {
        let raw = format!("{{\"a\": [1, 2,, }}{}", "x".repeat(1000));
        let raw = format!("{raw}}}");
        let err = extract_json(&raw, JsonShape::Object).unwrap_err();
        assert!(err.reason.starts_with("Failed to parse JSON"));
        assert_eq!(err.snippet.chars().count(), SNIPPET_CHARS);
    }

    #[test]
    fn test_snippet_respects_char_boundaries() {
        let raw = "é".repeat(400);
        let err = extract_json(&raw, JsonShape::Array).unwrap_err();
        assert_eq!(err.snippet.chars().count(), SNIPPET_CHARS);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let raw = String::from("```json\n{\"a\": 1}\n```");
        let before = raw.clone();
        extract_json(&raw, JsonShape::Object).unwrap();
        assert_eq!(raw, before);
    }

    #[test]
    fn test_detect_prefers_first_bracket() {
        assert_eq!(JsonShape::detect("[{}]"), Some(JsonShape::Array));
        assert_eq!(JsonShape::detect("{\"a\": []}"), Some(JsonShape::Object));
        assert_eq!(JsonShape::detect("plain"), None);
    }

    #[test]
    fn test_extract_any_json_array() {
        let value = extract_any_json("```json\n[1, 2, 3]\n```").unwrap();
        assert_eq!(value, json!([1, 2, 3]));
    }
}
