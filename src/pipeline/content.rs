//! Content service: submit a prompt to the hosted text model.
//!
//! This module is intentionally thin — all prompt engineering lives in
//! [`crate::prompts`] so it can be changed without touching transport or
//! error handling here.
//!
//! ## Failure policy
//!
//! The client never raises. Any transport error, non-success status, or
//! malformed payload is logged with the reason and converted into the
//! `None` failure sentinel. The batch driver treats `None` as "no
//! content" and fails that record at its all-or-nothing gate; there is
//! deliberately no retry, caching, or rate limiting — one outbound
//! request per invocation.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GenerationConfig;
use crate::error::ContractGenError;

/// Protocol version header required by the messages endpoint.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// The seam between the pipeline and the hosted text model.
///
/// Production uses [`AnthropicClient`]; tests substitute a stub that
/// fails for chosen prompts. `None` is the failure sentinel — a
/// conforming implementation never panics and never returns an error
/// type.
#[allow(async_fn_in_trait)]
pub trait ContentService {
    /// Send one prompt, return the model's text reply or `None`.
    async fn generate(&self, prompt: &str) -> Option<String>;
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: usize,
    temperature: f32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentSegment>,
}

#[derive(Deserialize)]
struct ContentSegment {
    text: Option<String>,
}

// ── Production client ────────────────────────────────────────────────────

/// HTTP client for the Anthropic messages API.
///
/// Holds one `reqwest::Client` (connection pooling across the four calls
/// per record) plus the fixed model parameters from the configuration.
pub struct AnthropicClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
}

impl AnthropicClient {
    /// Build a client from the configuration, reading the API key from
    /// `ANTHROPIC_API_KEY`. A missing key is fatal: no record could ever
    /// succeed without one.
    pub fn from_env(config: &GenerationConfig) -> Result<Self, ContractGenError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ContractGenError::ApiKeyMissing)?;
        Ok(Self::with_api_key(config, api_key))
    }

    /// Build a client with an explicit API key (tests, gateways).
    pub fn with_api_key(config: &GenerationConfig, api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.api_timeout_secs))
            .build()
            // Builder failure here means TLS backend misconfiguration; the
            // default client still lets the per-call error path report it.
            .unwrap_or_default();
        Self {
            client,
            endpoint: format!("{}/v1/messages", config.base_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    async fn request(&self, prompt: &str) -> Result<String, String> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("transport error: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(format!("HTTP {status}: {detail}"));
        }

        let payload: MessagesResponse = response
            .json()
            .await
            .map_err(|e| format!("malformed payload: {e}"))?;

        // The usable reply is the first text segment.
        payload
            .content
            .first()
            .and_then(|seg| seg.text.clone())
            .ok_or_else(|| "payload has no text segment".to_string())
    }
}

impl ContentService for AnthropicClient {
    async fn generate(&self, prompt: &str) -> Option<String> {
        match self.request(prompt).await {
            Ok(text) => {
                debug!("content reply: {} bytes", text.len());
                Some(text)
            }
            Err(reason) => {
                warn!("content generation failed: {reason}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let body = MessagesRequest {
            model: "claude-3-sonnet-20240229",
            max_tokens: 4096,
            temperature: 0.7,
            messages: [Message {
                role: "user",
                content: "hello",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "claude-3-sonnet-20240229");
        assert_eq!(json["max_tokens"], 4096);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
    }

    #[test]
    fn response_first_text_segment_wins() {
        let payload: MessagesResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"first"},{"type":"text","text":"second"}]}"#,
        )
        .unwrap();
        assert_eq!(payload.content[0].text.as_deref(), Some("first"));
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let config = crate::GenerationConfig::builder()
            .base_url("http://localhost:8080/")
            .build()
            .unwrap();
        let client = AnthropicClient::with_api_key(&config, "test-key".into());
        assert_eq!(client.endpoint, "http://localhost:8080/v1/messages");
    }
}
