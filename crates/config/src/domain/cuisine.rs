//! Cuisine profiles
//!
//! A profile carries the recognizer corrections that are specific to a
//! cuisine: pairs of (misheard form, corrected form) that both go into the
//! vocabulary bias list, plus conversational words that should never be
//! matched as dishes for that kind of restaurant.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::load_yaml;
use crate::ConfigError;

/// One recognizer correction pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneticAlias {
    /// What the recognizer tends to produce
    pub heard: String,
    /// What the customer actually said
    pub corrected: String,
}

impl PhoneticAlias {
    pub fn new(heard: impl Into<String>, corrected: impl Into<String>) -> Self {
        Self {
            heard: heard.into(),
            corrected: corrected.into(),
        }
    }
}

/// Cuisine-specific recognition profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuisineProfile {
    pub cuisine: String,
    /// Ordered so the vocabulary built from it is stable
    #[serde(default)]
    pub phonetic_aliases: Vec<PhoneticAlias>,
    #[serde(default)]
    pub stop_words: Vec<String>,
}

impl Default for CuisineProfile {
    fn default() -> Self {
        Self::indian()
    }
}

impl CuisineProfile {
    /// Empty profile for a cuisine with no curated corrections
    pub fn generic(cuisine: impl Into<String>) -> Self {
        Self {
            cuisine: cuisine.into(),
            phonetic_aliases: Vec::new(),
            stop_words: Vec::new(),
        }
    }

    /// Built-in profile for Indian restaurants
    pub fn indian() -> Self {
        let pairs = [
            ("malay", "malai"),
            ("costa", "kofta"),
            ("biriyani", "biryani"),
            ("bur ani", "biryani"),
            ("tick a", "tikka"),
            ("nan", "naan"),
            ("none bread", "naan"),
            ("pan ear", "paneer"),
            ("dal", "daal"),
            ("doll", "daal"),
            ("some osa", "samosa"),
            ("lassie", "lassi"),
            ("corner", "korma"),
            ("vinda lou", "vindaloo"),
            ("gulab jam", "gulab jamun"),
            ("tandoor e", "tandoori"),
            ("channa", "chana"),
            ("sag", "saag"),
        ];

        Self {
            cuisine: "indian".to_string(),
            phonetic_aliases: pairs
                .iter()
                .map(|(heard, corrected)| PhoneticAlias::new(*heard, *corrected))
                .collect(),
            stop_words: Vec::new(),
        }
    }

    /// Load a profile from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        load_yaml(path)
    }

    /// Look up a built-in profile by name
    pub fn builtin(cuisine: &str) -> Self {
        match cuisine.to_lowercase().as_str() {
            "indian" => Self::indian(),
            other => Self::generic(other),
        }
    }

    /// All alias pairs as `(heard, corrected)`
    pub fn alias_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.phonetic_aliases
            .iter()
            .map(|a| (a.heard.as_str(), a.corrected.as_str()))
    }
}
