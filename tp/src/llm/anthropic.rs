//! Anthropic Messages API text generator

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{LlmError, TextGenerator};
use crate::config::LlmConfig;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Claude text generator
pub struct AnthropicClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    temperature: f32,
    timeout: Duration,
    retry: LlmConfig,
}

impl AnthropicClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, base_url = %config.base_url, "from_config: called");
        let api_key = config
            .get_api_key()
            .map_err(|e| LlmError::Unavailable(e.to_string()))?;

        let timeout = config.request_timeout();
        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout,
            retry: config.clone(),
        })
    }

    /// Send one request and classify the outcome
    async fn send(&self, url: &str, body: &serde_json::Value) -> Result<String, LlmError> {
        let response = self
            .http
            .post(url)
            .header("x-api-key", self.api_key.clone())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout)
                } else {
                    LlmError::Network(e)
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            debug!(retry_after, "send: rate limited (429)");
            return Err(LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        if !response.status().is_success() {
            debug!(%status, "send: API error");
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, message });
        }

        let api_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        self.parse_response(api_response)
    }

    /// Build the request body for the Messages API
    fn build_request_body(&self, system: &str, user: &str) -> serde_json::Value {
        debug!(%self.model, "build_request_body: called");
        serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "system": system,
            "messages": [{ "role": "user", "content": user }],
        })
    }

    /// Join the text blocks of a response
    fn parse_response(&self, api_response: AnthropicResponse) -> Result<String, LlmError> {
        debug!(stop_reason = ?api_response.stop_reason, "parse_response: called");
        let text: String = api_response
            .content
            .into_iter()
            .filter_map(|block| match block {
                AnthropicContentBlock::Text { text } => Some(text),
                AnthropicContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        if text.trim().is_empty() {
            debug!("parse_response: no text content");
            return Err(LlmError::InvalidResponse("Response contained no text".to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        debug!(%self.model, user_len = user.len(), "complete: called");
        let url = format!("{}/v1/messages", self.base_url);
        let body = self.build_request_body(system, user);

        let mut attempt = 0;
        loop {
            let err = match self.send(&url, &body).await {
                Ok(text) => {
                    debug!(attempt, "complete: success");
                    return Ok(text);
                }
                Err(err) => err,
            };

            if attempt >= self.retry.max_retries || !err.is_retryable() {
                debug!(attempt, error = %err, "complete: giving up");
                return Err(err);
            }

            attempt += 1;
            let backoff = err.retry_after().unwrap_or_else(|| self.retry.retry_delay(attempt));
            warn!(attempt, backoff_ms = backoff.as_millis() as u64, error = %err, "complete: retrying after transient error");
            tokio::time::sleep(backoff).await;
        }
    }
}

// Anthropic API response types

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum AnthropicContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> AnthropicClient {
        AnthropicClient {
            model: "claude-sonnet-4".to_string(),
            api_key: "test-key".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            http: Client::new(),
            max_tokens: 2048,
            temperature: 0.1,
            timeout: Duration::from_secs(30),
            retry: LlmConfig::default(),
        }
    }

    #[test]
    fn test_build_request_body() {
        let body = client().build_request_body("You are a travel planner", "Plan Lisbon");

        assert_eq!(body["model"], "claude-sonnet-4");
        assert_eq!(body["max_tokens"], 2048);
        assert_eq!(body["system"], "You are a travel planner");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Plan Lisbon");
    }

    #[test]
    fn test_parse_response_joins_text_blocks() {
        let api_response: AnthropicResponse = serde_json::from_value(serde_json::json!({
            "content": [
                { "type": "text", "text": "Day 1" },
                { "type": "tool_use", "id": "t1", "name": "x", "input": {} },
                { "type": "text", "text": "Day 2" }
            ],
            "stop_reason": "end_turn"
        }))
        .unwrap();

        assert_eq!(client().parse_response(api_response).unwrap(), "Day 1\nDay 2");
    }

    #[test]
    fn test_parse_response_without_text_is_invalid() {
        let api_response: AnthropicResponse = serde_json::from_value(serde_json::json!({
            "content": [],
            "stop_reason": "max_tokens"
        }))
        .unwrap();

        assert!(matches!(
            client().parse_response(api_response),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_not_retried_forever() {
        let mut client = client();
        client.base_url = "http://127.0.0.1:1".to_string();
        client.retry = LlmConfig {
            max_retries: 0,
            ..LlmConfig::default()
        };

        let result = client.complete("system", "user").await;
        assert!(matches!(result, Err(LlmError::Network(_)) | Err(LlmError::Timeout(_))));
    }
}
