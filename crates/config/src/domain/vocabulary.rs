//! Recognizer vocabulary extraction rules

use serde::{Deserialize, Serialize};

use crate::constants::vocabulary;
use crate::ConfigError;

/// Configuration for building the recognizer bias list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// Hard ceiling on the number of keywords handed to the recognizer
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,

    /// Only the first `max_items` catalog items are processed
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// Minimum length for single-word names and individual name tokens
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,

    /// Enrichment-provided terms must be longer than this
    #[serde(default = "default_min_enriched_term_len")]
    pub min_enriched_term_len: usize,

    /// Boost weight attached to each term
    #[serde(default = "default_boost")]
    pub boost: f64,

    /// Words that sound like common English filler and confuse the recognizer
    #[serde(default = "default_blacklist")]
    pub blacklist: Vec<String>,
}

fn default_max_keywords() -> usize {
    vocabulary::MAX_KEYWORDS
}
fn default_max_items() -> usize {
    vocabulary::MAX_ITEMS
}
fn default_min_token_len() -> usize {
    vocabulary::MIN_TOKEN_LEN
}
fn default_min_enriched_term_len() -> usize {
    vocabulary::MIN_ENRICHED_TERM_LEN
}
fn default_boost() -> f64 {
    vocabulary::DEFAULT_BOOST
}
fn default_blacklist() -> Vec<String> {
    [
        // Sound like "and a" / "a loo" / "and" and get boosted into filler
        "anda", "aloo", "ande",
        // Size and modifier words that appear in every order
        "extra", "large", "small", "medium", "regular", "special", "combo", "plain",
        "order", "piece", "pieces", "portion", "serving",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            max_keywords: default_max_keywords(),
            max_items: default_max_items(),
            min_token_len: default_min_token_len(),
            min_enriched_term_len: default_min_enriched_term_len(),
            boost: default_boost(),
            blacklist: default_blacklist(),
        }
    }
}

impl VocabularyConfig {
    pub fn is_blacklisted(&self, word: &str) -> bool {
        let lower = word.trim().to_lowercase();
        self.blacklist.iter().any(|b| b.eq_ignore_ascii_case(&lower))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_keywords == 0 {
            return Err(ConfigError::InvalidValue {
                field: "vocabulary.max_keywords".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }
        if self.max_items == 0 {
            return Err(ConfigError::InvalidValue {
                field: "vocabulary.max_items".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }
        if self.boost <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "vocabulary.boost".to_string(),
                message: format!("Must be positive, got {}", self.boost),
            });
        }
        Ok(())
    }
}
