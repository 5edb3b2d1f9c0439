//! HTTP Oracle Provider
//!
//! Implementation of the OracleProvider trait for OpenAI-compatible
//! chat-completions endpoints. Issues a single non-streaming call per
//! request; deadlines are enforced by the caller, not here.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::provider::{missing_api_key_error, parse_http_error, OracleProvider};
use crate::types::{OracleError, OracleRequest, OracleResponse, OracleResult, UsageStats};

/// Default API endpoint
const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Configuration for the HTTP oracle provider.
#[derive(Debug, Clone)]
pub struct HttpOracleConfig {
    /// API key for the endpoint
    pub api_key: Option<String>,
    /// Base URL override (optional)
    pub base_url: Option<String>,
    /// Model name to use
    pub model: String,
}

impl Default for HttpOracleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: "gpt-4o-mini".to_string(),
        }
    }
}

/// Oracle provider backed by an OpenAI-compatible HTTP API.
pub struct HttpOracle {
    config: HttpOracleConfig,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    model: Option<String>,
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

impl HttpOracle {
    /// Create a new HTTP oracle with the given configuration
    pub fn new(config: HttpOracleConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Get the API base URL
    fn base_url(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Build the request body for the API
    fn build_request_body(&self, request: &OracleRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.user_prompt },
            ],
        })
    }
}

#[async_trait]
impl OracleProvider for HttpOracle {
    fn name(&self) -> &'static str {
        "http"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn review(&self, request: OracleRequest) -> OracleResult<OracleResponse> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| missing_api_key_error(self.name()))?;

        let body = self.build_request_body(&request);
        debug!(model = %self.config.model, "sending review request to oracle endpoint");

        let response = self
            .client
            .post(self.base_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| OracleError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(parse_http_error(status.as_u16(), &text, self.name()));
        }

        let parsed: ChatCompletionResponse =
            response.json().await.map_err(|e| OracleError::ParseError {
                message: format!("Invalid completion response: {}", e),
            })?;

        let content = parsed
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| OracleError::ParseError {
                message: "Completion response contained no choices".to_string(),
            })?;

        let usage = parsed
            .usage
            .map(|u| UsageStats {
                input_tokens: u.prompt_tokens.unwrap_or(0),
                output_tokens: u.completion_tokens.unwrap_or(0),
            })
            .unwrap_or_default();

        Ok(OracleResponse {
            content,
            model: parsed.model.unwrap_or_else(|| self.config.model.clone()),
            usage,
        })
    }

    async fn health_check(&self) -> OracleResult<()> {
        if self.config.api_key.is_none() {
            return Err(missing_api_key_error(self.name()));
        }
        Ok(())
    }
}
