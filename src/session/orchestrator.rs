//! Per-query pipeline: reason, analyze, fall back.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::ScoutError;
use crate::reasoning::Reasoner;
use crate::types::{ModelMessage, Role, Transcript};

use super::{analyzer, fallback};

/// Rendered answer when neither the model nor any tool produced usable text.
pub const NO_RESPONSE: &str = "(no response)";

const ARGS_SUMMARY_CHARS: usize = 120;
const RESULT_PREVIEW_CHARS: usize = 200;

/// Visibility trace of tool activity during a reasoning run.
///
/// Emitted as a side effect only; never part of the returned answer.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    ToolCall { name: String, args_summary: String },
    ToolResult { name: String, preview: String },
}

pub type TraceSink = Arc<dyn Fn(&TraceEvent) + Send + Sync>;

/// Drives the per-query pipeline against a reasoning capability constructed
/// once at startup. Each query gets a fresh transcript; no conversational
/// memory is carried across queries.
pub struct Session {
    reasoner: Arc<dyn Reasoner>,
    trace_sink: Option<TraceSink>,
}

impl Session {
    pub fn new(reasoner: Arc<dyn Reasoner>) -> Self {
        Self {
            reasoner,
            trace_sink: None,
        }
    }

    /// Install a sink for tool-activity trace events.
    pub fn with_trace_sink(mut self, sink: TraceSink) -> Self {
        self.trace_sink = Some(sink);
        self
    }

    /// Answer a single query. Always yields exactly one answer string;
    /// non-empty whenever any tool ran.
    pub async fn answer(&self, query: &str) -> Result<String, ScoutError> {
        debug!(query, "session: starting query");

        let transcript = self.reasoner.run(vec![ModelMessage::user(query)]).await?;
        self.emit_trace(&transcript);

        if let Some(answer) = analyzer::extract_answer(&transcript) {
            return Ok(answer);
        }

        match last_tool_payload(&transcript) {
            Some(payload) => {
                info!("session: no usable model reply, synthesizing from tool output");
                Ok(fallback::synthesize(payload))
            }
            None => Ok(NO_RESPONSE.to_string()),
        }
    }

    fn emit_trace(&self, transcript: &Transcript) {
        let Some(sink) = self.trace_sink.as_ref() else {
            return;
        };

        for msg in transcript {
            match msg.role {
                Role::Assistant => {
                    for call in msg.tool_calls() {
                        sink(&TraceEvent::ToolCall {
                            name: call.name.clone(),
                            args_summary: preview(&call.arguments.to_string(), ARGS_SUMMARY_CHARS),
                        });
                    }
                }
                Role::Tool => {
                    for result in msg.tool_results() {
                        sink(&TraceEvent::ToolResult {
                            name: result.tool_name.clone(),
                            preview: preview(&render_result(&result.result), RESULT_PREVIEW_CHARS),
                        });
                    }
                }
                Role::System | Role::User => {}
            }
        }
    }
}

/// The raw payload of the last tool result observed during the run.
fn last_tool_payload(transcript: &Transcript) -> Option<&serde_json::Value> {
    transcript.iter().rev().find_map(|msg| {
        if msg.role != Role::Tool {
            return None;
        }
        msg.tool_results().into_iter().last().map(|tr| &tr.result)
    })
}

fn render_result(result: &serde_json::Value) -> String {
    match result {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Truncate to at most `max` bytes at a valid UTF-8 boundary, marking cuts.
fn preview(output: &str, max: usize) -> String {
    if output.len() <= max {
        return output.to_string();
    }
    let mut end = max;
    while end > 0 && !output.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &output[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentPart, ToolCall};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Reasoner that returns a canned transcript extension.
    struct CannedReasoner {
        extension: Vec<ModelMessage>,
    }

    #[async_trait]
    impl Reasoner for CannedReasoner {
        async fn run(&self, mut transcript: Transcript) -> Result<Transcript, ScoutError> {
            transcript.extend(self.extension.clone());
            Ok(transcript)
        }
    }

    fn tool_call_message(name: &str) -> ModelMessage {
        ModelMessage {
            role: Role::Assistant,
            content: vec![ContentPart::ToolCall(ToolCall {
                id: "c1".into(),
                name: name.into(),
                arguments: json!({"query": "X"}),
            })],
            timestamp: None,
        }
    }

    #[tokio::test]
    async fn model_reply_wins_over_fallback() {
        let session = Session::new(Arc::new(CannedReasoner {
            extension: vec![
                tool_call_message("search_rows"),
                ModelMessage::tool_result("c1", "search_rows", json!({"match_count": 1}), false),
                ModelMessage::assistant("X's number is 555-1234."),
            ],
        }));

        let answer = session.answer("phone of X?").await.unwrap();
        assert_eq!(answer, "X's number is 555-1234.");
    }

    #[tokio::test]
    async fn empty_reply_with_tool_result_synthesizes_fallback() {
        let payload = json!({"results": [{"text": "X: 555-1234"}]});
        let session = Session::new(Arc::new(CannedReasoner {
            extension: vec![
                tool_call_message("retrieve_passages"),
                ModelMessage::tool_result("c1", "retrieve_passages", payload, false),
                ModelMessage::assistant(""),
            ],
        }));

        let answer = session.answer("phone of X?").await.unwrap();
        assert_eq!(answer, "Top result:\nX: 555-1234");
    }

    #[tokio::test]
    async fn empty_reply_without_tool_result_is_the_sentinel() {
        let session = Session::new(Arc::new(CannedReasoner {
            extension: vec![ModelMessage::assistant("   ")],
        }));

        let answer = session.answer("anything?").await.unwrap();
        assert_eq!(answer, NO_RESPONSE);
    }

    #[tokio::test]
    async fn trace_events_cover_calls_and_results() {
        let events: Arc<Mutex<Vec<TraceEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink_events = events.clone();

        let session = Session::new(Arc::new(CannedReasoner {
            extension: vec![
                tool_call_message("search_rows"),
                ModelMessage::tool_result("c1", "search_rows", json!("row data"), false),
                ModelMessage::assistant("done"),
            ],
        }))
        .with_trace_sink(Arc::new(move |event| {
            sink_events.lock().unwrap().push(event.clone());
        }));

        session.answer("q").await.unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            TraceEvent::ToolCall { name, .. } if name == "search_rows"
        ));
        assert!(matches!(
            &events[1],
            TraceEvent::ToolResult { preview, .. } if preview == "row data"
        ));
    }

    #[tokio::test]
    async fn reasoning_error_surfaces_to_caller() {
        struct FailingReasoner;

        #[async_trait]
        impl Reasoner for FailingReasoner {
            async fn run(&self, _transcript: Transcript) -> Result<Transcript, ScoutError> {
                Err(ScoutError::Provider {
                    provider: "google".into(),
                    message: "upstream failure".into(),
                })
            }
        }

        let session = Session::new(Arc::new(FailingReasoner));
        let err = session.answer("q").await.unwrap_err();
        assert!(matches!(err, ScoutError::Provider { .. }));
    }

    #[test]
    fn preview_truncates_at_char_boundary() {
        let long = format!("{}é", "a".repeat(199));
        let out = preview(&long, 200);
        assert!(out.ends_with("..."));
        assert_eq!(&out[..199], "a".repeat(199));
    }

    #[test]
    fn last_tool_payload_prefers_latest_message() {
        let transcript = vec![
            ModelMessage::tool_result("c1", "a", json!("first"), false),
            ModelMessage::assistant(""),
            ModelMessage::tool_result("c2", "b", json!("second"), false),
        ];
        assert_eq!(last_tool_payload(&transcript), Some(&json!("second")));
    }
}
