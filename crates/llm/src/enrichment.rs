//! LLM-backed menu enricher
//!
//! Sends one prompt per batch and parses the reply into enrichment records.
//! Models wrap JSON in code fences, add prose around it, or return an object
//! with an `items` array instead of a bare array; all of these are accepted.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use menu_voice_core::{EnrichmentRecord, Error, MenuEnricher, RawMenuItem, Result};

use crate::backend::{FinishReason, LlmBackend};
use crate::prompt::enrichment_messages;

pub struct LlmMenuEnricher {
    backend: Arc<dyn LlmBackend>,
    name: String,
}

impl LlmMenuEnricher {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        let name = format!("llm:{}", backend.model_name());
        Self { backend, name }
    }
}

#[async_trait]
impl MenuEnricher for LlmMenuEnricher {
    async fn enrich_batch(&self, items: &[RawMenuItem]) -> Result<Vec<EnrichmentRecord>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let messages = enrichment_messages(items);
        let prompt_tokens: usize = messages
            .iter()
            .map(|m| self.backend.estimate_tokens(&m.content))
            .sum();

        tracing::debug!(
            items = items.len(),
            prompt_tokens,
            model = self.backend.model_name(),
            "Requesting enrichment"
        );

        let result = self.backend.generate(&messages).await?;

        if result.finish_reason == FinishReason::Length {
            tracing::warn!(
                items = items.len(),
                tokens = result.tokens,
                "Enrichment reply hit the token limit"
            );
        }

        let records = parse_enrichment_reply(&result.text)?;

        tracing::debug!(
            items = items.len(),
            records = records.len(),
            elapsed_ms = result.total_time_ms,
            "Enrichment reply parsed"
        );

        Ok(records)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Parse a model reply into records that carry an `originalName`
///
/// Returns `Error::Enrichment` when no JSON array or object can be found.
/// Individual malformed entries are skipped.
pub fn parse_enrichment_reply(text: &str) -> Result<Vec<EnrichmentRecord>> {
    let value = extract_json(text)
        .ok_or_else(|| Error::Enrichment("No JSON found in enrichment reply".to_string()))?;

    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                return Err(Error::Enrichment(
                    "Enrichment reply 'items' is not an array".to_string(),
                ))
            }
            None => vec![Value::Object(map)],
        },
        other => {
            return Err(Error::Enrichment(format!(
                "Unexpected enrichment reply shape: {}",
                json_kind(&other)
            )))
        }
    };

    let total = entries.len();
    let records: Vec<EnrichmentRecord> = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<EnrichmentRecord>(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed enrichment entry");
                None
            }
        })
        .filter(|record| record.original_name().is_some())
        .collect();

    if records.len() < total {
        tracing::debug!(
            dropped = total - records.len(),
            total,
            "Dropped enrichment entries without a usable originalName"
        );
    }

    Ok(records)
}

/// Locate the JSON payload inside a model reply
fn extract_json(text: &str) -> Option<Value> {
    let body = strip_code_fence(text.trim());

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return Some(value);
    }

    // Prose around the payload: take the outermost bracketed span
    for (open, close) in [('[', ']'), ('{', '}')] {
        if let (Some(start), Some(end)) = (body.find(open), body.rfind(close)) {
            if start < end {
                if let Ok(value) = serde_json::from_str::<Value>(&body[start..=end]) {
                    return Some(value);
                }
            }
        }
    }

    None
}

fn strip_code_fence(text: &str) -> &str {
    let Some(start) = text.find("```") else {
        return text;
    };
    let after = &text[start + 3..];
    // Skip a language tag such as `json`
    let after = match after.find('\n') {
        Some(newline) => &after[newline + 1..],
        None => after,
    };
    match after.find("```") {
        Some(end) => after[..end].trim(),
        None => after.trim(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::GenerationResult;
    use crate::prompt::Message;
    use crate::LlmError;

    const REPLY: &str = r#"[
        {
            "originalName": "Malai Kofta",
            "dietary_tags": ["dairy", "nuts"],
            "ingredients_implied": ["paneer", "cashew", "cream"],
            "phonetic_correction": "malai kofta",
            "stt_keywords": ["malay kofta", "malai costa"]
        },
        {
            "dietary_tags": ["gluten"],
            "phonetic_correction": "garlic naan"
        }
    ]"#;

    #[test]
    fn test_parse_bare_array() {
        let records = parse_enrichment_reply(REPLY).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].original_name(), Some("Malai Kofta"));
        assert_eq!(records[0].dietary_tags, vec!["dairy", "nuts"]);
        assert_eq!(records[0].stt_keywords.len(), 2);
    }

    #[test]
    fn test_parse_fenced_reply_with_prose() {
        let reply = format!(
            "Sure! Here is the enrichment:\n```json\n{}\n```\nLet me know if you need more.",
            REPLY
        );
        let records = parse_enrichment_reply(&reply).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parse_unfenced_prose() {
        let reply = format!("Here you go: {} Hope that helps.", REPLY);
        assert_eq!(parse_enrichment_reply(&reply).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_items_object() {
        let reply = r#"{"items": [{"originalName": "Fish Curry", "dietary_tags": ["vegan_unfriendly"]}]}"#;
        let records = parse_enrichment_reply(reply).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].original_name(), Some("Fish Curry"));
    }

    #[test]
    fn test_parse_single_object() {
        let reply = r#"{"originalName": "Roti", "dietary_tags": ["gluten"]}"#;
        assert_eq!(parse_enrichment_reply(reply).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_skips_malformed_entries() {
        let reply = r#"[{"originalName": "Roti", "dietary_tags": "gluten"}, {"originalName": "Dal"}]"#;
        let records = parse_enrichment_reply(reply).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].original_name(), Some("Dal"));
    }

    #[test]
    fn test_parse_keeps_entries_with_null_lists() {
        let reply = r#"[{"originalName":"Garlic Naan","dietary_tags":["gluten"],"ingredients_implied":null,"phonetic_correction":"garlic naan","stt_keywords":null}]"#;
        let records = parse_enrichment_reply(reply).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].dietary_tags, vec!["gluten"]);
        assert!(records[0].stt_keywords.is_empty());
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(matches!(
            parse_enrichment_reply("I could not process this menu."),
            Err(Error::Enrichment(_))
        ));
        assert!(parse_enrichment_reply("\"just a string\"").is_err());
        assert!(parse_enrichment_reply(r#"{"items": "none"}"#).is_err());
    }

    struct ScriptedBackend {
        reply: std::result::Result<String, String>,
    }

    #[async_trait]
    impl LlmBackend for ScriptedBackend {
        async fn generate(
            &self,
            _messages: &[Message],
        ) -> std::result::Result<GenerationResult, LlmError> {
            match &self.reply {
                Ok(text) => Ok(GenerationResult {
                    text: text.clone(),
                    tokens: 10,
                    total_time_ms: 1,
                    finish_reason: FinishReason::Stop,
                }),
                Err(e) => Err(LlmError::Api(e.clone())),
            }
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn test_enricher_returns_records() {
        let enricher = LlmMenuEnricher::new(Arc::new(ScriptedBackend {
            reply: Ok(REPLY.to_string()),
        }));
        assert_eq!(enricher.name(), "llm:scripted");

        let items = vec![RawMenuItem::new("1", "Malai Kofta", 1299)];
        let records = enricher.enrich_batch(&items).await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_enricher_maps_backend_failure() {
        let enricher = LlmMenuEnricher::new(Arc::new(ScriptedBackend {
            reply: Err("HTTP 400".to_string()),
        }));

        let items = vec![RawMenuItem::new("1", "Malai Kofta", 1299)];
        let err = enricher.enrich_batch(&items).await.unwrap_err();
        assert!(matches!(err, Error::Llm(_)));
    }
}
