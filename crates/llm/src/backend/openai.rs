//! OpenAI-compatible backend (`/chat/completions`)
//!
//! Covers api.openai.com, Azure OpenAI deployments and local servers such
//! as vLLM or llama.cpp that expose the same route.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
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
pub struct OpenAIConfig {
    /// API root; for Azure the resource URL
    pub endpoint: String,
    pub api_key: String,
    /// Model name, or the deployment name on Azure
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
    pub timeout: Duration,
    pub max_retries: u32,
    pub initial_backoff: Duration,
    /// Set for Azure; switches routing and auth header
    pub api_version: Option<String>,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 4096,
            temperature: 0.1,
            timeout: Duration::from_secs(60),
            max_retries: 3,
            initial_backoff: Duration::from_millis(250),
            api_version: None,
        }
    }
}

impl OpenAIConfig {
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn azure(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: deployment.into(),
            api_version: Some(api_version.into()),
            ..Default::default()
        }
    }

    /// Local server; no key needed
    pub fn local(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    fn is_local(&self) -> bool {
        let host = self
            .endpoint
            .trim_start_matches("http://")
            .trim_start_matches("https://");
        host.starts_with("localhost") || host.starts_with("127.0.0.1")
    }
}

pub struct OpenAIBackend {
    client: Client,
    config: OpenAIConfig,
    retry: RetryPolicy,
}

impl OpenAIBackend {
    /// Remote endpoints require an API key
    pub fn new(config: OpenAIConfig) -> Result<Self, LlmError> {
        if config.api_key.is_empty() && !config.is_local() {
            return Err(LlmError::Configuration(format!(
                "API key required for {}",
                config.endpoint
            )));
        }

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

    fn root(&self) -> &str {
        self.config.endpoint.trim_end_matches('/')
    }

    fn chat_url(&self) -> String {
        match &self.config.api_version {
            Some(version) => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                self.root(),
                self.config.model,
                version
            ),
            None => format!("{}/chat/completions", self.root()),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if self.config.api_key.is_empty() {
            return headers;
        }

        let auth = match self.config.api_version {
            Some(_) => HeaderValue::from_str(&self.config.api_key)
                .map(|v| (HeaderName::from_static("api-key"), v)),
            None => HeaderValue::from_str(&format!("Bearer {}", self.config.api_key))
                .map(|v| (AUTHORIZATION, v)),
        };
        match auth {
            Ok((name, value)) => {
                headers.insert(name, value);
            }
            Err(_) => {
                tracing::warn!("API key contains invalid header characters, sending without auth")
            }
        }

        headers
    }
}

#[async_trait]
impl LlmBackend for OpenAIBackend {
    async fn generate(&self, messages: &[Message]) -> Result<GenerationResult, LlmError> {
        let started = Instant::now();
        let body = CompletionBody {
            model: self.config.model.clone(),
            messages: chat_messages(messages),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };
        let url = self.chat_url();

        let reply: CompletionReply = self
            .retry
            .run(|| send_json(self.client.post(&url).headers(self.headers()).json(&body)))
            .await?;

        let choice = reply
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?;

        Ok(GenerationResult {
            text: choice.message.content,
            tokens: reply.usage.map_or(0, |u| u.completion_tokens),
            total_time_ms: started.elapsed().as_millis() as u64,
            finish_reason: FinishReason::from_wire(choice.finish_reason.as_deref()),
        })
    }

    async fn is_available(&self) -> bool {
        // Azure has no deployment-agnostic probe
        if self.config.api_version.is_some() {
            return true;
        }

        let request = self
            .client
            .get(format!("{}/models", self.root()))
            .headers(self.headers())
            .timeout(Duration::from_secs(5));
        probe(request).await
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[derive(Debug, Serialize)]
struct CompletionBody {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionReply {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    completion_tokens: usize,
}
