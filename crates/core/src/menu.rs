//! Catalog item types
//!
//! `RawMenuItem` is what the POS sync hands us. `MenuItem` is the same entry
//! after (optional) enrichment: the four optional fields may be populated,
//! but `id`, `name` and `price` always come straight from the raw item.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::enrichment::ItemEnrichment;

/// Catalog entry as supplied by the POS sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMenuItem {
    /// Opaque catalog identifier, stable across syncs
    pub id: String,
    /// Canonical display name
    pub name: String,
    /// Price in minor currency units
    pub price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RawMenuItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Orderable menu item, possibly enriched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Simplified spelling used for phonetic comparison
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic_name: Option<String>,
    /// Allergen / diet labels such as `nuts` or `dairy`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_tags: Option<BTreeSet<String>>,
    /// Implied ingredients (informational only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    /// Curated alternate spellings and synonyms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stt_keywords: Option<Vec<String>>,
}

impl MenuItem {
    /// Create an un-enriched item
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            description: None,
            phonetic_name: None,
            dietary_tags: None,
            ingredients: None,
            stt_keywords: None,
        }
    }

    pub fn with_phonetic_name(mut self, phonetic_name: impl Into<String>) -> Self {
        self.phonetic_name = Some(phonetic_name.into());
        self
    }

    pub fn with_dietary_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dietary_tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = Some(ingredients.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_stt_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stt_keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    /// String used for phonetic comparison (`phonetic_name`, else `name`)
    pub fn phonetic_source(&self) -> &str {
        self.phonetic_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.name)
    }

    /// Curated keywords, empty when enrichment has not supplied any
    pub fn keywords(&self) -> &[String] {
        self.stt_keywords.as_deref().unwrap_or(&[])
    }

    /// Whether any of the four enrichment fields is populated
    pub fn is_enriched(&self) -> bool {
        self.phonetic_name.is_some()
            || self.dietary_tags.is_some()
            || self.ingredients.is_some()
            || self.stt_keywords.is_some()
    }

    /// Attach stored enrichment. Identity and price are never touched.
    pub fn apply_enrichment(mut self, enrichment: &ItemEnrichment) -> Self {
        self.dietary_tags = Some(enrichment.dietary_tags.clone());
        self.ingredients = Some(enrichment.ingredients.clone());
        self.phonetic_name = enrichment.phonetic_name.clone();
        self.stt_keywords = Some(enrichment.stt_keywords.clone());
        self
    }
}

impl From<RawMenuItem> for MenuItem {
    fn from(raw: RawMenuItem) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            price: raw.price,
            description: raw.description,
            phonetic_name: None,
            dietary_tags: None,
            ingredients: None,
            stt_keywords: None,
        }
    }
}

impl From<&RawMenuItem> for MenuItem {
    fn from(raw: &RawMenuItem) -> Self {
        raw.clone().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_phonetic_source_falls_back_to_name() {
        let item = MenuItem::new("1", "Malai Kofta", 1299);
        assert_eq!(item.phonetic_source(), "Malai Kofta");

        let item = item.with_phonetic_name("malai kofta");
        assert_eq!(item.phonetic_source(), "malai kofta");

        let blank = MenuItem::new("2", "Fish Curry", 1499).with_phonetic_name("  ");
        assert_eq!(blank.phonetic_source(), "Fish Curry");
    }

    #[test]
    fn test_apply_enrichment_preserves_identity() {
        let raw = RawMenuItem::new("sq-1", "Butter Chicken", 1599);
        let enrichment = ItemEnrichment {
            item_id: "sq-1".to_string(),
            original_name: "Butter Chicken".to_string(),
            dietary_tags: ["dairy".to_string()].into_iter().collect(),
            ingredients: vec!["chicken".to_string(), "butter".to_string()],
            phonetic_name: Some("butter chicken".to_string()),
            stt_keywords: vec!["murgh makhani".to_string()],
            updated_at: Utc::now(),
        };

        let item = MenuItem::from(&raw).apply_enrichment(&enrichment);
        assert_eq!(item.id, raw.id);
        assert_eq!(item.name, raw.name);
        assert_eq!(item.price, raw.price);
        assert!(item.is_enriched());
        assert_eq!(item.keywords(), &["murgh makhani".to_string()]);
    }

    #[test]
    fn test_serialization_skips_missing_enrichment() {
        let item = MenuItem::new("1", "Garlic Naan", 399);
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("dietaryTags"));
        assert!(!item.is_enriched());
    }
}
