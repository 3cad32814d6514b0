// Shared prompt fragments and prompt-building utilities.
// Each feature module defines its own prompts.rs alongside it.

/// Appended to prompts that expect a single JSON object.
pub const JSON_OBJECT_ONLY: &str =
    "Return ONLY valid JSON starting with { and ending with }. No markdown.";

/// Appended to prompts that expect a JSON array.
pub const JSON_ARRAY_ONLY: &str = "Return ONLY a valid JSON array with no markdown, no preamble, \
    no explanation. Start your response with [ and end with ].";

/// Reminds the model that multi-line string values must be escaped.
pub const ESCAPE_NEWLINES: &str =
    "All string values must be properly escaped. Use \\n for newlines inside strings.";

/// Truncates `text` to at most `max_chars` characters, keeping the prefix.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Joins the first `limit` items with `sep`.
pub fn join_first(items: &[String], limit: usize, sep: &str) -> String {
    items
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(sep)
}
