//! Best-effort answer synthesis from raw tool output.
//!
//! Used only when the model produced no usable text. Recognizes exactly two
//! known tool-result shapes (row-match results and passage-retrieval results)
//! and degrades to raw-text truncation otherwise; it is not a general JSON
//! renderer.

use serde_json::Value;

const MAX_RAW_CHARS: usize = 500;
const MAX_MATCH_ROWS: usize = 5;

/// Synthesize a human-readable answer from the last observed tool result.
pub fn synthesize(payload: &Value) -> String {
    let normalized = normalize_payload(payload);

    let parsed: Value = match serde_json::from_str(&normalized) {
        Ok(v) => v,
        Err(_) => return truncate_chars(&normalized, MAX_RAW_CHARS),
    };

    if let Some(obj) = parsed.as_object() {
        if let Some(matches) = obj.get("matches").and_then(Value::as_array) {
            let match_count = obj
                .get("match_count")
                .and_then(Value::as_i64)
                .unwrap_or(0);
            if match_count > 0 {
                return format_matches(matches);
            }
        }

        if let Some(first) = obj
            .get("results")
            .and_then(Value::as_array)
            .and_then(|r| r.first())
        {
            let text = first
                .get("text")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| first.to_string());
            return format!("Top result:\n{}", truncate_chars(&text, MAX_RAW_CHARS));
        }
    }

    truncate_chars(&normalized, MAX_RAW_CHARS)
}

/// Normalize a tool-result payload to a string. A sequence of `{type, text}`
/// records collapses to the first record's text; anything else is rendered
/// as-is (a JSON string without its quotes).
fn normalize_payload(payload: &Value) -> String {
    if let Some(arr) = payload.as_array() {
        if let Some(text) = arr
            .first()
            .and_then(|record| record.get("text"))
            .and_then(Value::as_str)
        {
            return text.to_string();
        }
    }

    match payload {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_matches(matches: &[Value]) -> String {
    let mut lines = vec!["Found:".to_string()];
    for entry in matches.iter().take(MAX_MATCH_ROWS) {
        match entry.as_object() {
            Some(fields) => {
                let rendered = fields
                    .iter()
                    .filter(|(key, _)| key.as_str() != "_sheet")
                    .map(|(key, value)| format!("{key}: {}", render_value(value)))
                    .collect::<Vec<_>>()
                    .join(", ");
                lines.push(format!("  • {rendered}"));
            }
            None => lines.push(format!("  • {}", render_value(entry))),
        }
    }
    lines.join("\n")
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn row_matches_format_as_bulleted_list() {
        let payload = json!({
            "matches": [
                {"name": "A", "phone": "123"},
                {"name": "B", "phone": "456"}
            ],
            "match_count": 2
        });
        assert_eq!(
            synthesize(&payload),
            "Found:\n  • name: A, phone: 123\n  • name: B, phone: 456"
        );
    }

    #[test]
    fn sheet_field_is_omitted() {
        let payload = json!({
            "matches": [{"name": "A", "_sheet": "contacts", "phone": "123"}],
            "match_count": 1
        });
        assert_eq!(synthesize(&payload), "Found:\n  • name: A, phone: 123");
    }

    #[test]
    fn at_most_five_matches_are_listed() {
        let rows: Vec<Value> = (0..8).map(|i| json!({"n": i})).collect();
        let payload = json!({"matches": rows, "match_count": 8});
        let out = synthesize(&payload);
        assert_eq!(out.lines().count(), 6); // "Found:" + 5 bullets
        assert!(out.contains("n: 4"));
        assert!(!out.contains("n: 5"));
    }

    #[test]
    fn zero_match_count_falls_through_to_raw() {
        let payload = json!({"matches": [], "match_count": 0});
        assert_eq!(synthesize(&payload), payload.to_string());
    }

    #[test]
    fn top_result_truncates_to_500_chars() {
        let passage = "x".repeat(800);
        let payload = json!({"results": [{"text": passage}]});
        let out = synthesize(&payload);
        assert_eq!(out, format!("Top result:\n{}", "x".repeat(500)));
    }

    #[test]
    fn result_without_text_renders_whole_element() {
        let payload = json!({"results": [{"score": 0.9}]});
        let out = synthesize(&payload);
        assert!(out.starts_with("Top result:\n"));
        assert!(out.contains("0.9"));
    }

    #[test]
    fn non_json_string_is_returned_verbatim_up_to_500_chars() {
        let raw = "X: 555-1234, office hours 9-5";
        assert_eq!(synthesize(&json!(raw)), raw);

        let long = "y".repeat(700);
        assert_eq!(synthesize(&json!(long.clone())), "y".repeat(500));
    }

    #[test]
    fn content_record_sequence_uses_first_text() {
        let payload = json!([
            {"type": "text", "text": "{\"results\": [{\"text\": \"a passage\"}]}"},
            {"type": "text", "text": "ignored"}
        ]);
        assert_eq!(synthesize(&payload), "Top result:\na passage");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let raw = "é".repeat(600);
        let out = synthesize(&json!(raw.clone()));
        assert_eq!(out.chars().count(), 500);
        assert_eq!(out, "é".repeat(500));
    }
}
