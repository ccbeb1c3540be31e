//! Recognizer vocabulary extraction
//!
//! Builds the bounded keyword list handed to the speech recognizer before a
//! call starts. Item-derived terms come first in catalog order, followed by
//! both sides of every cuisine alias pair. Entries are deduplicated
//! case-insensitively before the list is truncated.

use std::collections::HashSet;

use menu_voice_config::{CuisineProfile, VocabularyConfig};
use menu_voice_core::MenuItem;

use crate::normalize::{normalize, tokens};

#[derive(Debug, Clone, Default)]
pub struct VocabularyExtractor {
    config: VocabularyConfig,
}

/// Accumulates unique terms in insertion order
struct KeywordList {
    seen: HashSet<String>,
    terms: Vec<String>,
}

impl KeywordList {
    fn push(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            return;
        }
        if self.seen.insert(term.to_lowercase()) {
            self.terms.push(term.to_string());
        }
    }
}

impl VocabularyExtractor {
    pub fn new(config: VocabularyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VocabularyConfig {
        &self.config
    }

    /// Ordered, deduplicated, capped keyword list
    pub fn extract_keywords(&self, items: &[MenuItem], profile: &CuisineProfile) -> Vec<String> {
        let cfg = &self.config;
        let mut list = KeywordList {
            seen: HashSet::new(),
            terms: Vec::new(),
        };

        for item in items.iter().take(cfg.max_items) {
            let name = normalize(&item.name);
            let words = tokens(&name);

            let keep_name = match words.len() {
                0 => false,
                1 => name.len() >= cfg.min_token_len && !cfg.is_blacklisted(&name),
                _ => true,
            };
            if keep_name {
                list.push(&name);
            }

            for word in &words {
                if word.len() >= cfg.min_token_len && !cfg.is_blacklisted(word) {
                    list.push(word);
                }
            }

            let enriched = item
                .phonetic_name
                .iter()
                .chain(item.keywords().iter());
            for term in enriched {
                let term = term.trim();
                if term.len() > cfg.min_enriched_term_len && !cfg.is_blacklisted(term) {
                    list.push(term);
                }
            }
        }

        for (heard, corrected) in profile.alias_pairs() {
            list.push(heard);
            list.push(corrected);
        }

        let mut keywords = list.terms;
        if keywords.len() > cfg.max_keywords {
            tracing::debug!(
                extracted = keywords.len(),
                cap = cfg.max_keywords,
                "Truncating recognizer vocabulary"
            );
            keywords.truncate(cfg.max_keywords);
        }
        keywords
    }

    /// `(term, weight)` pairs in the format the recognizer accepts
    pub fn boost_terms(&self, keywords: &[String]) -> Vec<(String, f64)> {
        keywords
            .iter()
            .map(|k| (k.clone(), self.config.boost))
            .collect()
    }
}
