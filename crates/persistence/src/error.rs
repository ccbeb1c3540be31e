//! Persistence errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

impl From<PersistenceError> for menu_voice_core::Error {
    fn from(err: PersistenceError) -> Self {
        menu_voice_core::Error::Store(err.to_string())
    }
}
