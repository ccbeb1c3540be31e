//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{endpoints, enrichment};
use crate::{ConfigError, CuisineProfile, DietaryConfig, MatchingConfig, VocabularyConfig};

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub server: ServerConfig,

    /// Resolution engine weights and gates
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Recognizer vocabulary caps and blacklist
    #[serde(default)]
    pub vocabulary: VocabularyConfig,

    /// Restriction categories and high-risk substrings
    #[serde(default)]
    pub dietary: DietaryConfig,

    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    #[serde(default)]
    pub llm: LlmSettings,

    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Built-in cuisine profile name
    #[serde(default = "default_cuisine")]
    pub cuisine: String,

    /// Optional YAML file overriding the built-in cuisine profile
    #[serde(default)]
    pub cuisine_profile_path: Option<PathBuf>,
}

fn default_cuisine() -> String {
    "indian".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: RuntimeEnvironment::default(),
            server: ServerConfig::default(),
            matching: MatchingConfig::default(),
            vocabulary: VocabularyConfig::default(),
            dietary: DietaryConfig::default(),
            enrichment: EnrichmentConfig::default(),
            llm: LlmSettings::default(),
            observability: ObservabilityConfig::default(),
            cuisine: default_cuisine(),
            cuisine_profile_path: None,
        }
    }
}

impl Settings {
    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.matching.validate()?;
        self.vocabulary.validate()?;
        self.validate_enrichment()?;
        self.validate_server()?;
        Ok(())
    }

    fn validate_enrichment(&self) -> Result<(), ConfigError> {
        if self.enrichment.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "enrichment.batch_size".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature".to_string(),
                message: format!("Must be between 0.0 and 2.0, got {}", self.llm.temperature),
            });
        }

        if self.environment.is_production()
            && self.enrichment.enabled
            && self.llm.provider == LlmProvider::OpenAi
            && self.llm.api_key.is_none()
        {
            return Err(ConfigError::InvalidValue {
                field: "llm.api_key".to_string(),
                message: "Required for the openai provider in production".to_string(),
            });
        }

        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }
        Ok(())
    }

    /// Resolve the cuisine profile: the YAML override when configured,
    /// otherwise the built-in profile named by `cuisine`
    pub fn cuisine_profile(&self) -> Result<CuisineProfile, ConfigError> {
        match &self.cuisine_profile_path {
            Some(path) => CuisineProfile::load(path),
            None => Ok(CuisineProfile::builtin(&self.cuisine)),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// CORS allowed origins; empty allows any
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            cors_origins: Vec::new(),
        }
    }
}

/// Background enrichment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// When false, catalogs are served unenriched
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Items per generative call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// JSON snapshot of the enrichment store; in-memory only when unset
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}
fn default_batch_size() -> usize {
    enrichment::BATCH_SIZE
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            batch_size: default_batch_size(),
            snapshot_path: None,
        }
    }
}

/// Generative backend provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Ollama,
    #[serde(rename = "openai")]
    OpenAi,
}

/// Generative backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default)]
    pub provider: LlmProvider,

    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Defaults per provider when unset
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Azure OpenAI API version; switches the openai provider to Azure routing
    #[serde(default)]
    pub api_version: Option<String>,

    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_llm_model() -> String {
    "qwen2.5:7b".to_string()
}
fn default_llm_timeout() -> u64 {
    60
}
fn default_temperature() -> f32 {
    0.1
}
fn default_max_tokens() -> usize {
    4096
}
fn default_max_retries() -> u32 {
    3
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: default_llm_model(),
            endpoint: None,
            api_key: None,
            api_version: None,
            timeout_secs: default_llm_timeout(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_retries: default_max_retries(),
        }
    }
}

impl LlmSettings {
    /// Configured endpoint or the provider default
    pub fn endpoint_or_default(&self) -> String {
        match (&self.endpoint, self.provider) {
            (Some(endpoint), _) => endpoint.clone(),
            (None, LlmProvider::Ollama) => endpoints::OLLAMA_DEFAULT.to_string(),
            (None, LlmProvider::OpenAi) => endpoints::OPENAI_DEFAULT.to_string(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Load settings from files and environment
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("MENU_VOICE")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    tracing::debug!(
        environment = ?settings.environment,
        cuisine = %settings.cuisine,
        provider = ?settings.llm.provider,
        "Settings loaded"
    );

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.enrichment.batch_size, 20);
        assert_eq!(settings.cuisine, "indian");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::default();
        settings.enrichment.batch_size = 0;
        assert!(settings.validate().is_err());

        settings.enrichment.batch_size = 10;
        settings.matching.min_score = 1.2;
        assert!(settings.validate().is_err());

        settings.matching.min_score = 0.55;
        settings.vocabulary.max_items = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_production_openai_requires_key() {
        let mut settings = Settings::default();
        settings.environment = RuntimeEnvironment::Production;
        settings.llm.provider = LlmProvider::OpenAi;
        assert!(settings.validate().is_err());

        settings.llm.api_key = Some("sk-test".to_string());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_endpoint_defaults_per_provider() {
        let mut llm = LlmSettings::default();
        assert_eq!(llm.endpoint_or_default(), "http://localhost:11434");

        llm.provider = LlmProvider::OpenAi;
        assert_eq!(llm.endpoint_or_default(), "https://api.openai.com/v1");

        llm.endpoint = Some("http://gateway:8000".to_string());
        assert_eq!(llm.endpoint_or_default(), "http://gateway:8000");
    }

    #[test]
    fn test_settings_from_yaml() {
        let yaml = r#"
environment: production
matching:
  min_score: 0.6
llm:
  provider: openai
  api_key: sk-test
enrichment:
  snapshot_path: /tmp/enrichment.json
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert!(settings.environment.is_production());
        assert_eq!(settings.matching.min_score, 0.6);
        assert_eq!(settings.matching.ambiguity_margin, 0.08);
        assert_eq!(settings.llm.provider, LlmProvider::OpenAi);
        assert_eq!(
            settings.enrichment.snapshot_path,
            Some(PathBuf::from("/tmp/enrichment.json"))
        );
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_cuisine_profile_resolution() {
        let settings = Settings::default();
        let profile = settings.cuisine_profile().unwrap();
        assert_eq!(profile.cuisine, "indian");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thai.yaml");
        std::fs::write(&path, "cuisine: thai\nstop_words: [\"spicy\"]\n").unwrap();

        let settings = Settings {
            cuisine_profile_path: Some(path),
            ..Default::default()
        };
        let profile = settings.cuisine_profile().unwrap();
        assert_eq!(profile.cuisine, "thai");
        assert_eq!(profile.stop_words, vec!["spicy".to_string()]);
    }
}
