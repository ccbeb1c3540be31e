//! Resolution engine tuning
//!
//! Weights and decision-gate thresholds. Defaults come from
//! [`crate::constants::matching`] and must stay behaviourally identical.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::constants::matching;
use crate::ConfigError;

/// Fusion weights for the three candidate signals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalWeights {
    #[serde(default = "default_phonetic_weight")]
    pub phonetic: f64,
    #[serde(default = "default_token_weight")]
    pub token: f64,
    #[serde(default = "default_keyword_weight")]
    pub keyword: f64,
}

fn default_phonetic_weight() -> f64 {
    matching::PHONETIC_WEIGHT
}
fn default_token_weight() -> f64 {
    matching::TOKEN_WEIGHT
}
fn default_keyword_weight() -> f64 {
    matching::KEYWORD_WEIGHT
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            phonetic: default_phonetic_weight(),
            token: default_token_weight(),
            keyword: default_keyword_weight(),
        }
    }
}

/// Matching configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    #[serde(default)]
    pub weights: SignalWeights,

    /// Reject gate: minimum fused score for a match
    #[serde(default = "default_min_score")]
    pub min_score: f64,

    /// Ambiguity gate: top-two gap below which both are returned
    #[serde(default = "default_ambiguity_margin")]
    pub ambiguity_margin: f64,

    /// Suggestion floor used when the reject gate fires
    #[serde(default = "default_suggestion_threshold")]
    pub suggestion_threshold: f64,

    /// Per-token similarity must exceed this to count towards the token score
    #[serde(default = "default_token_match_floor")]
    pub token_match_floor: f64,

    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// Extra conversational words merged into the built-in stop-word set
    #[serde(default)]
    pub extra_stop_words: BTreeSet<String>,
}

fn default_min_score() -> f64 {
    matching::MIN_SCORE
}
fn default_ambiguity_margin() -> f64 {
    matching::AMBIGUITY_MARGIN
}
fn default_suggestion_threshold() -> f64 {
    matching::SUGGESTION_THRESHOLD
}
fn default_token_match_floor() -> f64 {
    matching::TOKEN_MATCH_FLOOR
}
fn default_max_suggestions() -> usize {
    matching::MAX_SUGGESTIONS
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: SignalWeights::default(),
            min_score: default_min_score(),
            ambiguity_margin: default_ambiguity_margin(),
            suggestion_threshold: default_suggestion_threshold(),
            token_match_floor: default_token_match_floor(),
            max_suggestions: default_max_suggestions(),
            extra_stop_words: BTreeSet::new(),
        }
    }
}

impl MatchingConfig {
    /// Validate ranges and ordering of thresholds
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit_fields = [
            ("matching.weights.phonetic", self.weights.phonetic),
            ("matching.weights.token", self.weights.token),
            ("matching.weights.keyword", self.weights.keyword),
            ("matching.min_score", self.min_score),
            ("matching.ambiguity_margin", self.ambiguity_margin),
            ("matching.suggestion_threshold", self.suggestion_threshold),
            ("matching.token_match_floor", self.token_match_floor),
        ];

        for (field, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: format!("Must be between 0.0 and 1.0, got {}", value),
                });
            }
        }

        if self.suggestion_threshold > self.min_score {
            return Err(ConfigError::InvalidValue {
                field: "matching.suggestion_threshold".to_string(),
                message: format!(
                    "Must not exceed min_score ({}), got {}",
                    self.min_score, self.suggestion_threshold
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_values() {
        let config = MatchingConfig::default();
        assert_eq!(config.weights.phonetic, 0.5);
        assert_eq!(config.weights.token, 0.4);
        assert_eq!(config.weights.keyword, 0.1);
        assert_eq!(config.min_score, 0.55);
        assert_eq!(config.ambiguity_margin, 0.08);
        assert_eq!(config.suggestion_threshold, 0.35);
        assert_eq!(config.max_suggestions, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: MatchingConfig = serde_yaml::from_str("min_score: 0.6").unwrap();
        assert_eq!(config.min_score, 0.6);
        assert_eq!(config.ambiguity_margin, 0.08);
        assert_eq!(config.weights.phonetic, 0.5);
    }

    #[test]
    fn test_validation_rejects_bad_ranges() {
        let mut config = MatchingConfig::default();
        config.weights.token = 1.5;
        assert!(config.validate().is_err());

        let mut config = MatchingConfig::default();
        config.suggestion_threshold = 0.7;
        assert!(config.validate().is_err());
    }
}
