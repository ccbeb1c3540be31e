//! Enrichment types
//!
//! `EnrichmentRecord` is the wire shape the generative backend returns for
//! one item. `ItemEnrichment` is what gets persisted, keyed by catalog item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// Per-item enrichment as returned by the generative backend
///
/// Models send `null` for lists they have nothing for; those read as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    /// Name of the item this record describes; records without it are unusable
    #[serde(rename = "originalName", default)]
    pub original_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dietary_tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ingredients_implied: Vec<String>,
    #[serde(default)]
    pub phonetic_correction: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub stt_keywords: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl EnrichmentRecord {
    /// The original name, if present and non-blank
    pub fn original_name(&self) -> Option<&str> {
        self.original_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Persisted enrichment for one catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEnrichment {
    pub item_id: String,
    pub original_name: String,
    #[serde(default)]
    pub dietary_tags: BTreeSet<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub phonetic_name: Option<String>,
    #[serde(default)]
    pub stt_keywords: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl ItemEnrichment {
    /// Build a stored enrichment from a backend record.
    ///
    /// Tags and the phonetic name are lowercased; blank entries are dropped.
    pub fn from_record(item_id: impl Into<String>, record: &EnrichmentRecord) -> Option<Self> {
        let original_name = record.original_name()?.to_string();

        let dietary_tags = record
            .dietary_tags
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        let ingredients = clean_list(&record.ingredients_implied);
        let stt_keywords = clean_list(&record.stt_keywords);

        let phonetic_name = record
            .phonetic_correction
            .as_deref()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty());

        Some(Self {
            item_id: item_id.into(),
            original_name,
            dietary_tags,
            ingredients,
            phonetic_name,
            stt_keywords,
            updated_at: Utc::now(),
        })
    }
}

fn clean_list(values: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values
        .iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && seen.insert(v.to_lowercase()))
        .collect()
}
