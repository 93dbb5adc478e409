//! HTTP plumbing shared by the provider implementations.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::ScoutError;

/// One client for the whole process; built lazily on first use.
pub fn shared_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to build HTTP client")
    })
}

/// Headers for a Bearer-token JSON API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, value);
    }
    headers
}

/// Turn a non-200 response into a typed error. Credential rejections get
/// their own variant so startup can report them distinctly.
pub fn status_to_error(status: u16, body: &str) -> ScoutError {
    if status == 401 || status == 403 {
        ScoutError::Authentication(body.to_string())
    } else {
        ScoutError::api(status, body)
    }
}
