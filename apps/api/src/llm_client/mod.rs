/// LLM Client — the single point of entry for all text-generation calls.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// All generation goes through the `TextGenerator` seam so handlers and the
/// pipeline never depend on a concrete provider.
///
/// Model: claude-sonnet-4-5 (hardcoded — do not make configurable to prevent drift)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classify::{classify, Failure, QUOTA_EXCEEDED_MESSAGE};
use crate::errors::AppError;

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all generation calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;
const MAX_RETRIES: u32 = 3;

/// Opaque text generation: prompt in, raw model text out.
///
/// The raw output is untrusted — callers run it through the sanitizer before
/// treating it as structured data.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AppError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct LlmResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// The production `TextGenerator`. Wraps the Anthropic Messages API with
/// bounded retry on 429/5xx. Retry lives here, inside the opaque generator —
/// the pipeline components themselves never retry.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Makes a raw call to the Claude API, returning the first text block.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff;
    /// exhausted 429 retries surface as a quota failure.
    async fn call(&self, prompt: &str, system: &str) -> Result<String, AppError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error: Option<AppError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    let classification =
                        classify(Failure::Error(&e), "text generation request failed");
                    last_error = Some(
                        if classification.is_network_error || e.is_connect() || e.is_timeout() {
                            AppError::Network(classification.message)
                        } else {
                            AppError::Internal(e.into())
                        },
                    );
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(if status.as_u16() == 429 {
                    AppError::Quota(QUOTA_EXCEEDED_MESSAGE.to_string())
                } else {
                    AppError::Server {
                        status: status.as_u16(),
                        message: body,
                    }
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                // Try to parse error message
                let message = serde_json::from_str::<AnthropicError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(AppError::Application(format!(
                    "text generation failed: {message}"
                )));
            }

            let llm_response: LlmResponse =
                response.json().await.map_err(|e| AppError::Server {
                    status: status.as_u16(),
                    message: format!("invalid response envelope: {e}"),
                })?;

            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                llm_response.usage.input_tokens, llm_response.usage.output_tokens
            );

            return llm_response
                .text()
                .map(str::to_string)
                .ok_or_else(|| AppError::Application("model returned empty content".to_string()));
        }

        Err(last_error
            .unwrap_or_else(|| AppError::Quota(QUOTA_EXCEEDED_MESSAGE.to_string())))
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        self.call(prompt, prompts::JSON_OUTPUT_SYSTEM).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_response_text_picks_first_text_block() {
        let json = r#"{
            "content": [
                {"type": "thinking", "text": null},
                {"type": "text", "text": "hello"},
                {"type": "text", "text": "ignored"}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 2}
        }"#;
        let response: LlmResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("hello"));
    }

    #[test]
    fn test_llm_response_without_text_block_is_empty() {
        let json = r#"{
            "content": [{"type": "tool_use", "text": null}],
            "usage": {"input_tokens": 1, "output_tokens": 1}
        }"#;
        let response: LlmResponse = serde_json::from_str(json).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_anthropic_error_body_parses() {
        let json = r#"{"error": {"message": "rate limited"}}"#;
        let parsed: AnthropicError = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.error.message, "rate limited");
    }
}
