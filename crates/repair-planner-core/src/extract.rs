//! Locate the JSON object inside free-form agent output.
//!
//! Agents wrap their answer in markdown fences or surround it with commentary
//! even when told not to. This is a heuristic, not a parser: it does not check
//! nesting or string escaping. Malformed JSON inside the located span surfaces
//! later as a deserialization failure, not here.

const FENCE: &str = "```";

/// Return the candidate JSON object text, or `None` when the output holds no
/// `{ ... }` span.
///
/// 1. Trim. Blank input yields `None`.
/// 2. If the text opens with a fence, drop the first line (fence plus
///    language tag) and everything from the last fence onward, then trim.
/// 3. If what remains starts with `{` and ends with `}`, return it verbatim.
/// 4. Otherwise return the span from the first `{` to the last `}` inclusive,
///    provided the `}` comes after the `{`.
pub fn extract_json(raw: &str) -> Option<&str> {
    let mut text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if text.starts_with(FENCE) {
        if let Some(newline) = text.find('\n') {
            text = &text[newline + 1..];
        }
        if let Some(closing) = text.rfind(FENCE) {
            text = &text[..closing];
        }
        text = text.trim();
    }

    if text.starts_with('{') && text.ends_with('}') {
        return Some(text);
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
