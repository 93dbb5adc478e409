//! The reasoning capability: model-driven tool selection.
//!
//! The orchestrator depends only on the [`Reasoner`] trait; [`ToolLoopReasoner`]
//! is the shipped implementation that drives a model provider through a
//! generate/execute-tools loop.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::ScoutError;
use crate::provider::{ModelProvider, ProviderRequest, ToolDefinition};
use crate::tools::arguments::ToolArguments;
use crate::tools::tool::Tool;
use crate::types::{
    ContentPart, GenerationSettings, ModelMessage, Role, Transcript,
};

/// Maximum tool loop iterations to prevent infinite loops.
const MAX_TOOL_ITERATIONS: usize = 20;

/// Fixed tool-use policy handed to the model on every run.
const SYSTEM_INSTRUCTION: &str = "\
You are a question-answering assistant with access to a set of tools. \
Use the tools to look up the information needed to answer the user's \
question; prefer tool output over your own knowledge. Never refuse to \
answer and never return an empty reply: always finish with a short, \
direct answer in plain text.";

/// A capability that, given a transcript, produces an extended transcript
/// with the model's tool exchanges and final reply appended.
#[async_trait]
pub trait Reasoner: Send + Sync {
    async fn run(&self, transcript: Transcript) -> Result<Transcript, ScoutError>;
}

/// Reasoner that loops a model provider over a tool set until the model
/// produces a final text reply (or the iteration cap is hit).
pub struct ToolLoopReasoner {
    provider: Box<dyn ModelProvider>,
    tools: Vec<Box<dyn Tool>>,
    settings: GenerationSettings,
}

impl ToolLoopReasoner {
    pub fn new(provider: Box<dyn ModelProvider>, tools: Vec<Box<dyn Tool>>) -> Self {
        Self {
            provider,
            tools,
            settings: GenerationSettings::deterministic(),
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    fn tool_definitions(&self) -> Option<Vec<ToolDefinition>> {
        if self.tools.is_empty() {
            return None;
        }
        Some(
            self.tools
                .iter()
                .map(|t| ToolDefinition {
                    name: t.name().to_string(),
                    description: t.description().to_string(),
                    parameters: t.parameters().schema.clone(),
                })
                .collect(),
        )
    }

    async fn execute_call(
        &self,
        call: &crate::types::ToolCall,
    ) -> crate::types::ToolResult {
        let tool = self.tools.iter().find(|t| t.name() == call.name);
        match tool {
            Some(t) => {
                let args = ToolArguments::new(call.arguments.clone());
                match t.execute(&args).await {
                    Ok(val) => crate::types::ToolResult {
                        tool_call_id: call.id.clone(),
                        tool_name: call.name.clone(),
                        result: val,
                        is_error: false,
                    },
                    Err(e) => {
                        warn!(tool = %call.name, error = %e, "Tool execution failed");
                        crate::types::ToolResult {
                            tool_call_id: call.id.clone(),
                            tool_name: call.name.clone(),
                            result: serde_json::json!({"error": e.to_string()}),
                            is_error: true,
                        }
                    }
                }
            }
            None => {
                warn!(tool = %call.name, "Tool not found");
                crate::types::ToolResult {
                    tool_call_id: call.id.clone(),
                    tool_name: call.name.clone(),
                    result: serde_json::json!({"error": format!("Tool '{}' not found", call.name)}),
                    is_error: true,
                }
            }
        }
    }
}

#[async_trait]
impl Reasoner for ToolLoopReasoner {
    async fn run(&self, transcript: Transcript) -> Result<Transcript, ScoutError> {
        let tool_defs = self.tool_definitions();

        let mut messages = Vec::with_capacity(transcript.len() + 2);
        messages.push(ModelMessage::system(SYSTEM_INSTRUCTION));
        messages.extend(transcript);

        for iteration in 0..MAX_TOOL_ITERATIONS {
            let request = ProviderRequest {
                messages: messages.clone(),
                settings: self.settings.clone(),
                tools: tool_defs.clone(),
            };

            debug!(iteration, "reasoner: calling provider");
            let response = self.provider.generate_text(&request).await?;

            if response.tool_calls.is_empty() {
                // Final reply
                messages.push(ModelMessage {
                    role: Role::Assistant,
                    content: vec![ContentPart::Text {
                        text: response.text,
                    }],
                    timestamp: Some(chrono::Utc::now()),
                });
                return Ok(messages);
            }

            // Assistant turn with tool calls (and any interim text)
            let mut assistant_content: Vec<ContentPart> = Vec::new();
            if !response.text.is_empty() {
                assistant_content.push(ContentPart::Text {
                    text: response.text.clone(),
                });
            }
            for tc in &response.tool_calls {
                assistant_content.push(ContentPart::ToolCall(tc.clone()));
            }
            messages.push(ModelMessage {
                role: Role::Assistant,
                content: assistant_content,
                timestamp: Some(chrono::Utc::now()),
            });

            for tc in &response.tool_calls {
                let result = self.execute_call(tc).await;
                messages.push(ModelMessage::tool_result(
                    result.tool_call_id.clone(),
                    result.tool_name.clone(),
                    result.result,
                    result.is_error,
                ));
            }
        }

        warn!(
            max_iterations = MAX_TOOL_ITERATIONS,
            "reasoner: iteration cap reached without a final reply"
        );
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderResponse;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Provider that emits a scripted sequence of responses.
    struct ScriptedProvider {
        responses: Vec<ProviderResponse>,
        cursor: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<ProviderResponse>) -> Self {
            Self {
                responses,
                cursor: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ModelProvider for ScriptedProvider {
        fn provider_name(&self) -> &str {
            "scripted"
        }

        fn model_id(&self) -> &str {
            "scripted-1"
        }

        async fn generate_text(
            &self,
            _request: &ProviderRequest,
        ) -> Result<ProviderResponse, ScoutError> {
            let i = self.cursor.fetch_add(1, Ordering::SeqCst);
            self.responses
                .get(i)
                .cloned()
                .ok_or_else(|| ScoutError::Provider {
                    provider: "scripted".into(),
                    message: "ran out of scripted responses".into(),
                })
        }
    }

    struct StaticTool {
        calls: Arc<AtomicUsize>,
        parameters: crate::tools::types::ToolParameters,
    }

    #[async_trait]
    impl Tool for StaticTool {
        fn name(&self) -> &str {
            "search_rows"
        }

        fn description(&self) -> &str {
            "lookup spreadsheet rows"
        }

        fn parameters(&self) -> &crate::tools::types::ToolParameters {
            &self.parameters
        }

        async fn execute(&self, _args: &ToolArguments) -> Result<serde_json::Value, ScoutError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!({"match_count": 1, "matches": [{"name": "X", "phone": "555-1234"}]}))
        }
    }

    fn tool_call_response(name: &str) -> ProviderResponse {
        ProviderResponse {
            text: String::new(),
            tool_calls: vec![crate::types::ToolCall {
                id: "call_1".into(),
                name: name.into(),
                arguments: json!({"query": "X"}),
            }],
        }
    }

    fn text_response(text: &str) -> ProviderResponse {
        ProviderResponse {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }

    #[tokio::test]
    async fn plain_reply_appends_one_assistant_message() {
        let reasoner = ToolLoopReasoner::new(
            Box::new(ScriptedProvider::new(vec![text_response("42")])),
            Vec::new(),
        );

        let out = reasoner.run(vec![ModelMessage::user("meaning?")]).await.unwrap();

        // system + user + assistant
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].role, Role::System);
        assert_eq!(out[2].role, Role::Assistant);
        assert_eq!(out[2].text(), "42");
    }

    #[tokio::test]
    async fn tool_call_is_executed_and_fed_back() {
        let calls = Arc::new(AtomicUsize::new(0));
        let tool = StaticTool {
            calls: calls.clone(),
            parameters: crate::tools::types::ToolParameters::empty(),
        };
        let reasoner = ToolLoopReasoner::new(
            Box::new(ScriptedProvider::new(vec![
                tool_call_response("search_rows"),
                text_response("The phone number is 555-1234."),
            ])),
            vec![Box::new(tool)],
        );

        let out = reasoner
            .run(vec![ModelMessage::user("phone number of X?")])
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // system, user, assistant(tool call), tool, assistant(final)
        assert_eq!(out.len(), 5);
        assert_eq!(out[3].role, Role::Tool);
        let results = out[3].tool_results();
        assert_eq!(results[0].tool_name, "search_rows");
        assert!(!results[0].is_error);
        assert_eq!(out[4].text(), "The phone number is 555-1234.");
    }

    #[tokio::test]
    async fn unknown_tool_yields_error_result_not_abort() {
        let reasoner = ToolLoopReasoner::new(
            Box::new(ScriptedProvider::new(vec![
                tool_call_response("no_such_tool"),
                text_response("I could not look that up."),
            ])),
            Vec::new(),
        );

        let out = reasoner.run(vec![ModelMessage::user("q")]).await.unwrap();
        let tool_msg = out.iter().find(|m| m.role == Role::Tool).unwrap();
        assert!(tool_msg.tool_results()[0].is_error);
    }

    #[tokio::test]
    async fn provider_error_surfaces_unmodified() {
        let reasoner = ToolLoopReasoner::new(
            Box::new(ScriptedProvider::new(Vec::new())),
            Vec::new(),
        );
        let err = reasoner.run(vec![ModelMessage::user("q")]).await.unwrap_err();
        assert!(matches!(err, ScoutError::Provider { .. }));
    }
}
