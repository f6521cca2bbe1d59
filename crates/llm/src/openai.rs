//! OpenAI-compatible chat completions provider

use crate::error::LlmError;
use crate::CommentSynthesizer;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use tsdocbot_core::config::LlmConfig;
use tsdocbot_core::error::{Error, Result};
use tsdocbot_core::{with_retry, RetryPolicy};

const SYSTEM_PROMPT: &str = "You are a senior TypeScript engineer who writes concise, \
accurate JSDoc documentation.";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Synthesizer backed by any `/chat/completions` endpoint
pub struct OpenAiSynthesizer {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    retry_policy: RetryPolicy,
}

impl OpenAiSynthesizer {
    /// Create a new provider
    ///
    /// # Arguments
    /// * `config` - LLM settings (model, endpoint, timeout, retries)
    /// * `api_key` - Bearer token for the API
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self> {
        info!("Initializing OpenAI-compatible synthesizer");
        info!("  Model: {}", config.model);
        info!("  API base URL: {}", config.api_base_url);
        info!("  Timeout: {}s", config.timeout_secs);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::ConfigError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/chat/completions",
                config.api_base_url.trim_end_matches('/')
            ),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            retry_policy: RetryPolicy::new(config.retry_attempts),
        })
    }

    /// Override the backoff policy
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    async fn complete(&self, prompt: &str) -> std::result::Result<String, LlmError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let error_kind = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connection"
                } else {
                    "request"
                };
                LlmError::RequestFailed(format!("{error_kind}: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            warn!("Chat completion returned {status}: {error_text}");
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse completion: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| LlmError::InvalidResponse("Completion has no content".to_string()))
    }
}

#[async_trait]
impl CommentSynthesizer for OpenAiSynthesizer {
    async fn synthesize(&self, prompt: &str) -> Result<String> {
        debug!("Requesting completion ({} prompt bytes)", prompt.len());
        with_retry(&self.retry_policy, "Chat completion", || async {
            self.complete(prompt).await.map_err(Error::from)
        })
        .await
    }
}
