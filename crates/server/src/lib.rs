//! Menu Voice Server
//!
//! Thin HTTP surface over the ordering engine: catalog refresh, merged menu,
//! recognizer vocabulary, and per-call order sessions.

pub mod http;
pub mod state;

pub use http::create_router;
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Catalog not found: {0}")]
    CatalogNotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<menu_voice_config::ConfigError> for ServerError {
    fn from(err: menu_voice_config::ConfigError) -> Self {
        ServerError::Config(err.to_string())
    }
}

impl From<menu_voice_persistence::PersistenceError> for ServerError {
    fn from(err: menu_voice_persistence::PersistenceError) -> Self {
        ServerError::Internal(err.to_string())
    }
}

impl From<menu_voice_llm::LlmError> for ServerError {
    fn from(err: menu_voice_llm::LlmError) -> Self {
        ServerError::Config(err.to_string())
    }
}

impl From<&ServerError> for StatusCode {
    fn from(err: &ServerError) -> Self {
        match err {
            ServerError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::CatalogNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = StatusCode::from(&self);
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
