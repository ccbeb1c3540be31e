//! Ollama backend (`/api/chat`)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::{
    chat_messages, http_client, probe, send_json, ChatMessage, FinishReason, GenerationResult,
    LlmBackend, RetryPolicy,
};
use crate::prompt::Message;
use crate::LlmError;

#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub model: String,
    /// Server root, e.g. `http://localhost:11434`
    pub endpoint: String,
    pub max_tokens: usize,
    pub temperature: f32,
    pub timeout: Duration,
    pub max_retries: u32,
    /// Doubles on each retry
    pub initial_backoff: Duration,
    /// How long the server keeps the model loaded ("5m", "-1", ...)
    pub keep_alive: Option<String>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            model: "qwen2.5:7b".to_string(),
            endpoint: "http://localhost:11434".to_string(),
            max_tokens: 4096,
            temperature: 0.1,
            timeout: Duration::from_secs(60),
            max_retries: 3,
            initial_backoff: Duration::from_millis(250),
            keep_alive: Some("5m".to_string()),
        }
    }
}

pub struct OllamaBackend {
    client: Client,
    config: OllamaConfig,
    retry: RetryPolicy,
}

impl OllamaBackend {
    pub fn new(config: OllamaConfig) -> Result<Self, LlmError> {
        let retry = RetryPolicy {
            max_retries: config.max_retries,
            initial_backoff: config.initial_backoff,
        };
        Ok(Self {
            client: http_client(config.timeout)?,
            config,
            retry,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    fn body(&self, messages: &[Message]) -> ChatBody {
        ChatBody {
            model: self.config.model.clone(),
            messages: chat_messages(messages),
            stream: false,
            options: ChatOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
            keep_alive: self.config.keep_alive.clone(),
        }
    }
}

#[async_trait]
impl LlmBackend for OllamaBackend {
    async fn generate(&self, messages: &[Message]) -> Result<GenerationResult, LlmError> {
        let started = Instant::now();
        let body = self.body(messages);
        let url = self.url("chat");

        let reply: ChatReply = self
            .retry
            .run(|| send_json(self.client.post(&url).json(&body)))
            .await?;

        Ok(GenerationResult {
            text: reply.message.content,
            tokens: reply.eval_count.unwrap_or(0),
            total_time_ms: started.elapsed().as_millis() as u64,
            finish_reason: FinishReason::from_wire(reply.done_reason.as_deref()),
        })
    }

    async fn is_available(&self) -> bool {
        probe(self.client.get(self.url("tags"))).await
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[derive(Debug, Serialize)]
struct ChatBody {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: ChatOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    keep_alive: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
    num_predict: usize,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    message: ChatMessage,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    eval_count: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body() {
        let backend = OllamaBackend::new(OllamaConfig {
            keep_alive: None,
            ..Default::default()
        })
        .unwrap();

        let json = serde_json::to_value(backend.body(&[Message::user("hi")])).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["num_predict"], 4096);
        assert_eq!(json["messages"][0]["role"], "user");
        assert!(json.get("keep_alive").is_none());
    }

    #[test]
    fn test_reply_parsing() {
        let body = r#"{"model":"qwen","message":{"role":"assistant","content":"[]"},"done":true,"done_reason":"length","eval_count":3}"#;
        let reply: ChatReply = serde_json::from_str(body).unwrap();
        assert_eq!(reply.message.content, "[]");
        assert_eq!(reply.eval_count, Some(3));
        assert_eq!(
            FinishReason::from_wire(reply.done_reason.as_deref()),
            FinishReason::Length
        );
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let backend = OllamaBackend::new(OllamaConfig {
            endpoint: "http://gpu-box:11434/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(backend.url("chat"), "http://gpu-box:11434/api/chat");
    }
}
