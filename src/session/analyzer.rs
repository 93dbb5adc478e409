//! Extracts the model's final answer from a finished transcript.

use crate::types::{ContentPart, ModelMessage, Role};

/// Extract the best human-readable answer from a transcript, or `None`.
///
/// Only the most recent assistant message is consulted: an earlier assistant
/// turn's text is presumed stale relative to the latest reasoning step, so
/// there is deliberately no fall-through when the latest one is empty.
/// Tool-call arguments are never read as an answer.
pub fn extract_answer(transcript: &[ModelMessage]) -> Option<String> {
    let latest = transcript.iter().rev().find(|m| m.role == Role::Assistant)?;

    let fragments: Vec<&str> = latest
        .content
        .iter()
        .filter_map(|part| match part {
            ContentPart::Text { text } => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            ContentPart::ToolCall(_) | ContentPart::ToolResult(_) => None,
        })
        .collect();

    if fragments.is_empty() {
        None
    } else {
        Some(fragments.join("\n"))
    }
}
