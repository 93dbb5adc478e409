//! Google Gemini API provider.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::ScoutError;
use crate::types::{ContentPart, ModelMessage, Role, ToolCall};

use super::http::shared_client;
use super::{ModelProvider, ProviderRequest, ProviderResponse};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GoogleProvider {
    model: String,
    api_key: String,
    base_url: String,
}

impl GoogleProvider {
    pub fn new(model: impl Into<String>, api_key: String, base_url: Option<String>) -> Self {
        Self {
            model: model.into(),
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.into()),
        }
    }

    fn request_body(&self, request: &ProviderRequest) -> Value {
        let mut body = Map::new();
        let mut contents = Vec::new();

        for msg in &request.messages {
            match msg.role {
                // Gemini takes the system prompt out of band.
                Role::System => {
                    body.insert(
                        "systemInstruction".into(),
                        json!({ "parts": [{ "text": msg.text() }] }),
                    );
                }
                Role::User => {
                    contents.push(json!({
                        "role": "user",
                        "parts": [{ "text": msg.text() }],
                    }));
                }
                Role::Assistant => {
                    contents.push(json!({
                        "role": "model",
                        "parts": encode_model_parts(msg),
                    }));
                }
                Role::Tool => {
                    for result in msg.tool_results() {
                        contents.push(json!({
                            "role": "function",
                            "parts": [{
                                "functionResponse": {
                                    "name": result.tool_name,
                                    "response": object_response(&result.result),
                                }
                            }]
                        }));
                    }
                }
            }
        }
        body.insert("contents".into(), Value::Array(contents));

        if let Some(config) = generation_config(request) {
            body.insert("generationConfig".into(), config);
        }

        match &request.tools {
            Some(tools) if !tools.is_empty() => {
                let declarations: Vec<Value> = tools
                    .iter()
                    .map(|t| {
                        json!({
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters,
                        })
                    })
                    .collect();
                body.insert(
                    "tools".into(),
                    json!([{ "functionDeclarations": declarations }]),
                );
            }
            _ => {}
        }

        Value::Object(body)
    }
}

#[async_trait]
impl ModelProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, ScoutError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        debug!(model = %self.model, "Google generate_text");

        let response = shared_client()
            .post(&url)
            .json(&self.request_body(request))
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let detail = response.text().await.unwrap_or_default();
            return Err(super::http::status_to_error(status, &detail));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ScoutError::api(200, "No candidates in Gemini response"))?;

        let mut text = String::new();
        let mut tool_calls = Vec::new();
        for part in candidate.content.parts {
            if let Some(chunk) = part.text {
                text.push_str(&chunk);
            }
            if let Some(call) = part.function_call {
                // Gemini does not assign call ids; mint one so tool results
                // can be correlated in the transcript.
                tool_calls.push(ToolCall {
                    id: uuid::Uuid::new_v4().to_string(),
                    name: call.name,
                    arguments: call.args.unwrap_or_else(|| json!({})),
                });
            }
        }

        Ok(ProviderResponse { text, tool_calls })
    }
}

fn generation_config(request: &ProviderRequest) -> Option<Value> {
    let settings = &request.settings;
    let mut config = Map::new();
    if let Some(max_tokens) = settings.max_tokens {
        config.insert("maxOutputTokens".into(), json!(max_tokens));
    }
    if let Some(temperature) = settings.temperature {
        config.insert("temperature".into(), json!(temperature));
    }
    if let Some(top_p) = settings.top_p {
        config.insert("topP".into(), json!(top_p));
    }
    if let Some(stops) = &settings.stop_sequences {
        config.insert("stopSequences".into(), json!(stops));
    }
    (!config.is_empty()).then(|| Value::Object(config))
}

fn encode_model_parts(msg: &ModelMessage) -> Vec<Value> {
    let mut parts = Vec::new();
    for part in &msg.content {
        match part {
            ContentPart::Text { text } => parts.push(json!({ "text": text })),
            ContentPart::ToolCall(call) => parts.push(json!({
                "functionCall": {
                    "name": call.name,
                    "args": call.arguments,
                }
            })),
            ContentPart::ToolResult(_) => {}
        }
    }
    parts
}

/// `functionResponse.response` must be an object; scalar and string
/// payloads get wrapped.
fn object_response(result: &Value) -> Value {
    if result.is_object() {
        result.clone()
    } else {
        json!({ "result": result })
    }
}

// generateContent response shapes (internal)

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandidatePart {
    text: Option<String>,
    function_call: Option<FunctionCall>,
}

#[derive(Deserialize)]
struct FunctionCall {
    name: String,
    args: Option<Value>,
}
