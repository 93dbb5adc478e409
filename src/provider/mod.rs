//! Model provider trait and implementations.

pub mod google;
pub mod http;
pub mod openai;

use async_trait::async_trait;

use crate::config::ScoutConfig;
use crate::error::ScoutError;
use crate::types::{GenerationSettings, ModelMessage, ToolCall};

/// Model used when Gemini credentials are present.
pub const GOOGLE_MODEL: &str = "gemini-2.5-flash";
/// Model used when only OpenAI credentials are present.
pub const OPENAI_MODEL: &str = "gpt-4o-mini";

/// A request sent to a model provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Response from a provider.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
}

/// Core trait implemented by all model providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "openai", "google").
    fn provider_name(&self) -> &str;

    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Generate one model turn (non-streaming).
    async fn generate_text(&self, request: &ProviderRequest)
        -> Result<ProviderResponse, ScoutError>;
}

/// Create the reasoning provider for this process.
///
/// Selected once at startup: Gemini when GOOGLE_API_KEY is set, OpenAI when
/// OPENAI_API_KEY is set, fatal configuration error otherwise. The choice is
/// never re-evaluated mid-session.
pub fn create_provider(config: &ScoutConfig) -> Result<Box<dyn ModelProvider>, ScoutError> {
    if let Some(api_key) = config.get_api_key("google") {
        return Ok(Box::new(google::GoogleProvider::new(
            GOOGLE_MODEL,
            api_key.to_string(),
            config.get_base_url("google"),
        )));
    }

    if let Some(api_key) = config.get_api_key("openai") {
        return Ok(Box::new(openai::OpenAiProvider::new(
            OPENAI_MODEL,
            api_key.to_string(),
            config.get_base_url("openai"),
        )));
    }

    Err(ScoutError::Configuration(
        "Set GOOGLE_API_KEY or OPENAI_API_KEY in the environment or .env".into(),
    ))
}
