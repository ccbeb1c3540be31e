//! Generative backends
//!
//! - `OllamaBackend` - local models through `/api/chat`
//! - `OpenAIBackend` - OpenAI, Azure OpenAI and compatible servers through
//!   `/chat/completions`
//!
//! Both speak the same role/content chat shape and share one request path:
//! network errors, timeouts and 5xx responses are retried with exponential
//! backoff, 4xx responses fail immediately.

mod ollama;
mod openai;

pub use ollama::{OllamaBackend, OllamaConfig};
pub use openai::{OpenAIBackend, OpenAIConfig};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::prompt::Message;
use crate::LlmError;

/// One completed generation
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub text: String,
    /// Completion tokens reported by the server, 0 when unknown
    pub tokens: usize,
    pub total_time_ms: u64,
    pub finish_reason: FinishReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    /// Output was cut at the token limit
    Length,
}

impl FinishReason {
    fn from_wire(reason: Option<&str>) -> Self {
        match reason {
            Some("length") => Self::Length,
            _ => Self::Stop,
        }
    }
}

#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn generate(&self, messages: &[Message]) -> Result<GenerationResult, LlmError>;

    /// Cheap reachability probe for readiness checks
    async fn is_available(&self) -> bool;

    fn model_name(&self) -> &str;

    /// Rough token estimate, ~4 graphemes per token
    fn estimate_tokens(&self, text: &str) -> usize {
        use unicode_segmentation::UnicodeSegmentation;

        (text.graphemes(true).count() / 4).max(1)
    }
}

/// Chat message as both wire protocols encode it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role.to_string(),
            content: message.content.clone(),
        }
    }
}

fn chat_messages(messages: &[Message]) -> Vec<ChatMessage> {
    messages.iter().map(ChatMessage::from).collect()
}

fn http_client(timeout: Duration) -> Result<Client, LlmError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Configuration(format!("Failed to create HTTP client: {}", e)))
}

/// Retry policy shared by both backends
#[derive(Debug, Clone, Copy)]
struct RetryPolicy {
    max_retries: u32,
    initial_backoff: Duration,
}

impl RetryPolicy {
    async fn run<T, F, Fut>(&self, op: F) -> Result<T, LlmError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        with_retry(self.max_retries, self.initial_backoff, op).await
    }
}

fn is_retryable(error: &LlmError) -> bool {
    matches!(error, LlmError::Network(_) | LlmError::Timeout)
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// retry budget is spent
async fn with_retry<T, F, Fut>(
    max_retries: u32,
    initial_backoff: Duration,
    mut op: F,
) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let mut backoff = initial_backoff;
    let mut attempt = 0;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if is_retryable(&e) && attempt < max_retries => {
                attempt += 1;
                tracing::warn!(
                    error = %e,
                    attempt,
                    max_retries,
                    backoff_ms = backoff.as_millis() as u64,
                    "LLM request failed, retrying"
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Send a prepared request and decode a JSON body
///
/// 5xx maps to `Network` so the retry policy picks it up.
async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, LlmError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(if status.is_server_error() {
            LlmError::Network(format!("Server error {}: {}", status, body))
        } else {
            LlmError::Api(format!("HTTP {}: {}", status, body))
        });
    }

    response
        .json()
        .await
        .map_err(|e| LlmError::InvalidResponse(e.to_string()))
}

/// Whether the probe request answered with a success status
async fn probe(request: RequestBuilder) -> bool {
    request
        .send()
        .await
        .map(|r| r.status().is_success())
        .unwrap_or(false)
}
