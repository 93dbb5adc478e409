//! Configuration loaded from the environment (with `.env` support).

use std::collections::HashMap;

/// Default URL of the MCP tool server.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000/mcp";

/// Runtime configuration for Scout.
///
/// Built once at startup and read-only afterwards. Provider credentials
/// decide which reasoning backend is constructed (see
/// [`crate::provider::create_provider`]).
#[derive(Debug, Clone)]
pub struct ScoutConfig {
    api_keys: HashMap<String, String>,
    base_urls: HashMap<String, String>,
    server_url: String,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoutConfig {
    /// Create an empty config with the default tool-server URL.
    pub fn new() -> Self {
        Self {
            api_keys: HashMap::new(),
            base_urls: HashMap::new(),
            server_url: DEFAULT_SERVER_URL.to_string(),
        }
    }

    /// Load from environment variables (GOOGLE_API_KEY, OPENAI_API_KEY, ...).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::new();

        let env_mappings = [
            ("GOOGLE_API_KEY", "google"),
            ("GEMINI_API_KEY", "google"),
            ("OPENAI_API_KEY", "openai"),
        ];

        for (env_var, provider) in &env_mappings {
            if let Ok(key) = std::env::var(env_var) {
                config.set_api_key(provider, key);
            }
        }

        // Base URL overrides
        let url_mappings = [
            ("GOOGLE_BASE_URL", "google"),
            ("OPENAI_BASE_URL", "openai"),
        ];

        for (env_var, provider) in &url_mappings {
            if let Ok(url) = std::env::var(env_var) {
                config.set_base_url(provider, url);
            }
        }

        if let Ok(url) = std::env::var("MCP_SERVER_URL") {
            config.server_url = url;
        }

        config
    }

    pub fn set_api_key(&mut self, provider: &str, key: String) {
        self.api_keys.insert(provider.to_string(), key);
    }

    pub fn get_api_key(&self, provider: &str) -> Option<&str> {
        self.api_keys.get(provider).map(String::as_str)
    }

    pub fn set_base_url(&mut self, provider: &str, url: String) {
        self.base_urls.insert(provider.to_string(), url);
    }

    pub fn get_base_url(&self, provider: &str) -> Option<String> {
        self.base_urls.get(provider).cloned()
    }

    /// Check if a provider has credentials configured.
    pub fn has_credentials(&self, provider: &str) -> bool {
        self.api_keys.contains_key(provider)
    }

    /// URL of the MCP tool server.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn set_server_url(&mut self, url: String) {
        self.server_url = url;
    }
}
