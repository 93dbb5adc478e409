//! OpenAI Chat Completions API provider.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::ScoutError;
use crate::types::{ModelMessage, Role, ToolCall, ToolResult};

use super::http::{bearer_headers, shared_client};
use super::{ModelProvider, ProviderRequest, ProviderResponse};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiProvider {
    model: String,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(model: impl Into<String>, api_key: String, base_url: Option<String>) -> Self {
        Self {
            model: model.into(),
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.into()),
        }
    }

    fn request_body(&self, request: &ProviderRequest) -> Value {
        let mut body = Map::new();
        body.insert("model".into(), json!(self.model));
        body.insert(
            "messages".into(),
            Value::Array(request.messages.iter().flat_map(encode_message).collect()),
        );

        let settings = &request.settings;
        if let Some(max_tokens) = settings.max_tokens {
            body.insert("max_tokens".into(), json!(max_tokens));
        }
        if let Some(temperature) = settings.temperature {
            body.insert("temperature".into(), json!(temperature));
        }
        if let Some(top_p) = settings.top_p {
            body.insert("top_p".into(), json!(top_p));
        }
        if let Some(stops) = &settings.stop_sequences {
            body.insert("stop".into(), json!(stops));
        }

        match &request.tools {
            Some(tools) if !tools.is_empty() => {
                let specs: Vec<Value> = tools.iter().map(|t| function_spec(t)).collect();
                body.insert("tools".into(), Value::Array(specs));
            }
            _ => {}
        }

        Value::Object(body)
    }
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, ScoutError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, "OpenAI generate_text");

        let response = shared_client()
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(&self.request_body(request))
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let detail = response.text().await.unwrap_or_default();
            return Err(super::http::status_to_error(status, &detail));
        }

        let parsed: ChatCompletion = response.json().await?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ScoutError::api(200, "No choices in OpenAI response"))?;

        let mut tool_calls = Vec::new();
        for raw in choice.message.tool_calls.unwrap_or_default() {
            // Arguments come back JSON-encoded inside a string; a payload
            // that fails to parse is kept verbatim for error reporting.
            let arguments = serde_json::from_str(&raw.function.arguments)
                .unwrap_or(Value::String(raw.function.arguments));
            tool_calls.push(ToolCall {
                id: raw.id,
                name: raw.function.name,
                arguments,
            });
        }

        Ok(ProviderResponse {
            text: choice.message.content.unwrap_or_default(),
            tool_calls,
        })
    }
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    }
}

/// Encode one transcript turn as Chat Completions messages. A tool-role
/// turn expands to one `tool` message per result it carries.
fn encode_message(msg: &ModelMessage) -> Vec<Value> {
    match msg.role {
        Role::Tool => msg.tool_results().into_iter().map(encode_tool_result).collect(),
        Role::Assistant => vec![encode_assistant(msg)],
        _ => vec![json!({ "role": role_name(msg.role), "content": msg.text() })],
    }
}

fn encode_assistant(msg: &ModelMessage) -> Value {
    let calls = msg.tool_calls();
    if calls.is_empty() {
        return json!({ "role": "assistant", "content": msg.text() });
    }

    let call_values: Vec<Value> = calls
        .iter()
        .map(|call| {
            json!({
                "id": call.id,
                "type": "function",
                "function": {
                    "name": call.name,
                    "arguments": call.arguments.to_string(),
                }
            })
        })
        .collect();

    let text = msg.text();
    let content = if text.is_empty() {
        Value::Null
    } else {
        Value::String(text)
    };
    json!({
        "role": "assistant",
        "content": content,
        "tool_calls": call_values,
    })
}

fn encode_tool_result(result: &ToolResult) -> Value {
    json!({
        "role": "tool",
        "tool_call_id": result.tool_call_id,
        "content": result.result.to_string(),
    })
}

fn function_spec(tool: &super::ToolDefinition) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.parameters,
        }
    })
}

// Chat Completions response shapes (internal)

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
    tool_calls: Option<Vec<RawToolCall>>,
}

#[derive(Deserialize)]
struct RawToolCall {
    id: String,
    function: RawFunction,
}

#[derive(Deserialize)]
struct RawFunction {
    name: String,
    arguments: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentPart;

    #[test]
    fn user_turn_encodes_as_string_content() {
        let encoded = encode_message(&ModelMessage::user("what is the phone number of X"));
        assert_eq!(encoded.len(), 1);
        assert_eq!(encoded[0]["role"], "user");
        assert_eq!(encoded[0]["content"], "what is the phone number of X");
    }

    #[test]
    fn tool_turn_encodes_with_call_id_and_stringified_result() {
        let msg = ModelMessage::tool_result("call_1", "search_rows", json!({"ok": true}), false);
        let encoded = encode_message(&msg);
        assert_eq!(encoded[0]["role"], "tool");
        assert_eq!(encoded[0]["tool_call_id"], "call_1");
        assert_eq!(encoded[0]["content"], "{\"ok\":true}");
    }

    #[test]
    fn assistant_turn_with_calls_encodes_null_content() {
        let msg = ModelMessage {
            role: Role::Assistant,
            content: vec![ContentPart::ToolCall(ToolCall {
                id: "call_9".into(),
                name: "retrieve_passages".into(),
                arguments: json!({"query": "phone"}),
            })],
            timestamp: None,
        };
        let encoded = encode_message(&msg);
        assert_eq!(encoded[0]["content"], Value::Null);
        assert_eq!(
            encoded[0]["tool_calls"][0]["function"]["name"],
            "retrieve_passages"
        );
        assert_eq!(
            encoded[0]["tool_calls"][0]["function"]["arguments"],
            "{\"query\":\"phone\"}"
        );
    }

    #[test]
    fn tools_are_declared_as_function_specs() {
        let provider = OpenAiProvider::new("gpt-4o-mini", "key".into(), None);
        let body = provider.request_body(&ProviderRequest {
            messages: vec![ModelMessage::user("q")],
            settings: crate::types::GenerationSettings::deterministic(),
            tools: Some(vec![crate::provider::ToolDefinition {
                name: "search_rows".into(),
                description: "row lookup".into(),
                parameters: json!({"type": "object"}),
            }]),
        });

        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "search_rows");
        assert_eq!(body["temperature"], 0.0);
    }
}
