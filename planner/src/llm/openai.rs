//! OpenAI-compatible chat completions client
//!
//! Ollama Cloud exposes the OpenAI Chat Completions API, so a single client
//! covers both the hosted default and any OpenAI-style endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError};
use crate::config::LlmConfig;

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Longest `retry-after` worth waiting for; anything longer fails the call
const MAX_HONORED_RETRY_AFTER: Duration = Duration::from_secs(5);

/// Used when a 429 carries no usable `retry-after`
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// How long to wait before the next attempt, or `None` to give up
///
/// `attempt` counts the retries already made. A rate limit waits exactly the
/// server's `retry-after`; other transient errors back off exponentially.
fn retry_delay(error: &LlmError, attempt: u32) -> Option<Duration> {
    if attempt >= MAX_RETRIES || !error.is_retryable() {
        return None;
    }
    match error {
        LlmError::RateLimited { retry_after } => (*retry_after <= MAX_HONORED_RETRY_AFTER).then_some(*retry_after),
        _ => Some(Duration::from_millis(INITIAL_BACKOFF_MS * 2u64.pow(attempt))),
    }
}

/// OpenAI-compatible API client
pub struct OpenAIClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    timeout: Duration,
    max_tokens: u32,
}

impl OpenAIClient {
    /// Create a new client from configuration
    ///
    /// Fails with `LlmError::NotConfigured` when no API key is available.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, base_url = %config.base_url, "from_config: called");
        let api_key = config.api_key().ok_or_else(|| LlmError::NotConfigured(config.api_key_env.clone()))?;

        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            timeout,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the request body for the chat completions endpoint
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");
        serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": request.prompt}],
            "max_tokens": request.max_tokens.min(self.max_tokens),
            "stream": false,
        })
    }

    fn request_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::Network(e)
        }
    }

    /// Decode a response body into a completion
    fn decode_response(&self, body: &str) -> Result<CompletionResponse, LlmError> {
        let api_response: OpenAIResponse = serde_json::from_str(body)?;
        if let Some(usage) = &api_response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "decode_response: token usage"
            );
        }

        let Some(choice) = api_response.choices.into_iter().next() else {
            debug!("decode_response: no choices");
            return Ok(CompletionResponse::default());
        };
        if choice.finish_reason.as_deref() == Some("length") {
            warn!(model = %self.model, "Completion hit the token limit and may be truncated");
        }
        Ok(CompletionResponse {
            content: choice.message.content,
        })
    }

    /// One HTTP round trip, with no retries
    async fn send_once(&self, url: &str, body: &serde_json::Value) -> Result<CompletionResponse, LlmError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            debug!(retry_after, "send_once: rate limited (429)");
            return Err(LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!(status, "send_once: API error");
            return Err(LlmError::ApiError { status, message });
        }

        let text = response.text().await.map_err(|e| self.request_error(e))?;
        self.decode_response(&text)
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, %request.max_tokens, "complete: called");
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(&request);

        let mut attempt = 0;
        loop {
            let error = match self.send_once(&url, &body).await {
                Ok(response) => {
                    debug!(attempt, "complete: success");
                    return Ok(response);
                }
                Err(e) => e,
            };

            let Some(delay) = retry_delay(&error, attempt) else {
                debug!(attempt, error = %error, "complete: giving up");
                return Err(error);
            };
            attempt += 1;
            warn!(attempt, delay_ms = delay.as_millis() as u64, error = %error, "complete: retrying");
            tokio::time::sleep(delay).await;
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// OpenAI API response types

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str, max_tokens: u32, timeout: Duration) -> OpenAIClient {
        OpenAIClient {
            model: "deepseek-v3.1:671b-cloud".to_string(),
            api_key: "test-key".to_string(),
            base_url: base_url.to_string(),
            http: Client::builder().timeout(timeout).build().unwrap(),
            timeout,
            max_tokens,
        }
    }

    fn client(max_tokens: u32) -> OpenAIClient {
        test_client("https://ollama.com", max_tokens, Duration::from_secs(30))
    }

    fn rate_limited(secs: u64) -> LlmError {
        LlmError::RateLimited {
            retry_after: Duration::from_secs(secs),
        }
    }

    #[test]
    fn test_build_request_body() {
        let body = client(8192).build_request_body(&CompletionRequest::prompt("Hello", 1000));

        assert_eq!(body["model"], "deepseek-v3.1:671b-cloud");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Hello");
    }

    #[test]
    fn test_max_tokens_capped() {
        let body = client(1000).build_request_body(&CompletionRequest::prompt("Test", 5000));
        assert_eq!(body["max_tokens"], 1000);
    }

    #[test]
    fn test_decode_response() {
        let response = client(1000)
            .decode_response(
                r#"{
                    "choices": [{"message": {"content": "1. What is it?"}, "finish_reason": "length"}],
                    "usage": {"prompt_tokens": 12, "completion_tokens": 34}
                }"#,
            )
            .unwrap();
        assert_eq!(response.content.as_deref(), Some("1. What is it?"));
    }

    #[test]
    fn test_decode_response_without_choices() {
        let response = client(1000).decode_response(r#"{"choices": []}"#).unwrap();
        assert!(response.content.is_none());
    }

    #[test]
    fn test_decode_garbage_is_json_error() {
        let err = client(1000).decode_response("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, LlmError::Json(_)));
    }

    #[test]
    fn test_rate_limit_waits_retry_after_only() {
        assert_eq!(retry_delay(&rate_limited(2), 0), Some(Duration::from_secs(2)));
        assert_eq!(retry_delay(&rate_limited(2), 2), Some(Duration::from_secs(2)));
        assert_eq!(retry_delay(&rate_limited(60), 0), None);
    }

    #[test]
    fn test_transient_errors_back_off_exponentially() {
        let unavailable = LlmError::ApiError {
            status: 503,
            message: String::new(),
        };
        assert_eq!(retry_delay(&unavailable, 0), Some(Duration::from_millis(1000)));
        assert_eq!(retry_delay(&unavailable, 1), Some(Duration::from_millis(2000)));
        assert_eq!(retry_delay(&unavailable, 2), Some(Duration::from_millis(4000)));
        assert_eq!(retry_delay(&unavailable, MAX_RETRIES), None);
        assert_eq!(
            retry_delay(&LlmError::Timeout(Duration::from_secs(1)), 0),
            Some(Duration::from_millis(1000))
        );
    }

    #[test]
    fn test_final_errors_are_not_retried() {
        let unauthorized = LlmError::ApiError {
            status: 401,
            message: "bad key".to_string(),
        };
        assert_eq!(retry_delay(&unauthorized, 0), None);
        assert_eq!(retry_delay(&LlmError::InvalidResponse("x".to_string()), 0), None);
    }

    #[tokio::test]
    async fn test_silent_server_is_timeout() {
        // Accepted by the kernel backlog but never answered
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let client = test_client(&base, 100, Duration::from_millis(200));

        let body = client.build_request_body(&CompletionRequest::prompt("Hi", 10));
        let err = client
            .send_once(&format!("{}/v1/chat/completions", base), &body)
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Timeout(t) if t == Duration::from_millis(200)));
        drop(listener);
    }
}
