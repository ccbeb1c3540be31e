//! LLM integration for menu enrichment
//!
//! Features:
//! - Multiple backend support (Ollama, OpenAI-compatible)
//! - Retry with exponential backoff on transient failures
//! - Enrichment prompt construction and tolerant reply parsing

pub mod backend;
pub mod enrichment;
pub mod factory;
pub mod prompt;

pub use backend::{
    FinishReason, GenerationResult, LlmBackend, OllamaBackend, OllamaConfig, OpenAIBackend,
    OpenAIConfig,
};
pub use enrichment::{parse_enrichment_reply, LlmMenuEnricher};
pub use factory::create_backend;
pub use prompt::{Message, Role};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for menu_voice_core::Error {
    fn from(err: LlmError) -> Self {
        menu_voice_core::Error::Llm(err.to_string())
    }
}
