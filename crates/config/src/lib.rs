//! Configuration management for the voice ordering engine
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default`, `config/{env}`)
//! - Environment variables (MENU_VOICE_ prefix, `__` separator)
//!
//! Matching weights and thresholds, vocabulary caps, the dietary risk table
//! and cuisine profiles all live here so they can be tuned without code
//! changes. Every default reproduces the reference behaviour exactly.

pub mod constants;
pub mod domain;
pub mod matching;
pub mod settings;

pub use domain::{
    CategoryRules, CuisineProfile, DietaryConfig, PhoneticAlias, RestrictionCategory,
    VocabularyConfig,
};
pub use matching::{MatchingConfig, SignalWeights};
pub use settings::{
    load_settings, EnrichmentConfig, LlmProvider, LlmSettings, ObservabilityConfig,
    RuntimeEnvironment, ServerConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
