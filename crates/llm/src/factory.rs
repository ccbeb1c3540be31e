//! Backend factory
//!
//! Builds the configured `LlmBackend` from settings.

use std::sync::Arc;
use std::time::Duration;

use menu_voice_config::{LlmProvider, LlmSettings};

use crate::backend::{LlmBackend, OllamaBackend, OllamaConfig, OpenAIBackend, OpenAIConfig};
use crate::LlmError;

/// Create the backend named by `settings.provider`
///
/// The OpenAI provider falls back to `OPENAI_API_KEY` when no key is
/// configured, and routes to Azure when `api_version` is set.
pub fn create_backend(settings: &LlmSettings) -> Result<Arc<dyn LlmBackend>, LlmError> {
    let timeout = Duration::from_secs(settings.timeout_secs);
    let endpoint = settings.endpoint_or_default();

    match settings.provider {
        LlmProvider::Ollama => {
            let config = OllamaConfig {
                model: settings.model.clone(),
                endpoint,
                max_tokens: settings.max_tokens,
                temperature: settings.temperature,
                timeout,
                max_retries: settings.max_retries,
                ..Default::default()
            };

            tracing::info!(model = %config.model, endpoint = %config.endpoint, "Using Ollama backend");
            Ok(Arc::new(OllamaBackend::new(config)?))
        }

        LlmProvider::OpenAi => {
            let api_key = settings
                .api_key
                .clone()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                .unwrap_or_default();

            let base = match &settings.api_version {
                Some(version) => OpenAIConfig::azure(endpoint, api_key, &settings.model, version),
                // Keyless servers; the backend rejects this for remote endpoints
                None if api_key.is_empty() => OpenAIConfig::local(endpoint, &settings.model),
                None => OpenAIConfig {
                    endpoint,
                    ..OpenAIConfig::openai(api_key, &settings.model)
                },
            };

            let config = OpenAIConfig {
                max_tokens: settings.max_tokens,
                temperature: settings.temperature,
                timeout,
                max_retries: settings.max_retries,
                ..base
            };

            tracing::info!(model = %config.model, endpoint = %config.endpoint, "Using OpenAI-compatible backend");
            Ok(Arc::new(OpenAIBackend::new(config)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ollama_backend() {
        let settings = LlmSettings::default();
        let backend = create_backend(&settings).unwrap();
        assert_eq!(backend.model_name(), "qwen2.5:7b");
    }

    #[test]
    fn test_create_openai_backend() {
        let settings = LlmSettings {
            provider: LlmProvider::OpenAi,
            model: "gpt-4o-mini".to_string(),
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        let backend = create_backend(&settings).unwrap();
        assert_eq!(backend.model_name(), "gpt-4o-mini");
    }

    #[test]
    fn test_local_openai_compatible_needs_no_key() {
        let settings = LlmSettings {
            provider: LlmProvider::OpenAi,
            model: "llama-3".to_string(),
            endpoint: Some("http://localhost:8000/v1".to_string()),
            ..Default::default()
        };
        assert!(create_backend(&settings).is_ok());
    }

    #[test]
    fn test_keyless_remote_openai_is_rejected() {
        if std::env::var("OPENAI_API_KEY").is_ok() {
            return;
        }
        let settings = LlmSettings {
            provider: LlmProvider::OpenAi,
            model: "gpt-4o-mini".to_string(),
            endpoint: Some("https://api.openai.com/v1".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            create_backend(&settings),
            Err(LlmError::Configuration(_))
        ));
    }
}
