//! Error types shared across the workspace

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// A generative enrichment call failed or returned unusable data
    #[error("Enrichment error: {0}")]
    Enrichment(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
