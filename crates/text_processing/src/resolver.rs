//! Resolution engine
//!
//! Fuses the candidate signals into one score per menu item, ranks the
//! catalog and routes the result through the decision gates:
//!
//! 1. stop word or empty transcript -> no result
//! 2. top score below `min_score` -> up to `max_suggestions` items above
//!    `suggestion_threshold`, otherwise no result
//! 3. top score at or above 1.0 -> matched, ambiguity check skipped
//! 4. top two within `ambiguity_margin` -> ambiguous pair
//! 5. otherwise -> matched

use std::collections::HashSet;

use menu_voice_config::constants::matching::PERFECT_SCORE;
use menu_voice_config::{CuisineProfile, MatchingConfig};
use menu_voice_core::{MenuItem, ResolutionResult, ScoredCandidate};

use crate::normalize::normalize;
use crate::scoring::{score_item, PreparedTranscript};

/// Conversational words that are never orderable
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "pickup",
    "pick up",
    "delivery",
    "menu",
    "cancel",
    "checkout",
    "check out",
    "order",
    "done",
    "thats all",
    "that is all",
    "nothing",
    "no",
    "yes",
    "hello",
    "hi",
    "thanks",
    "thank you",
    "repeat",
    "help",
];

/// Stateless matcher; safe to share across sessions
#[derive(Debug, Clone)]
pub struct MenuResolver {
    config: MatchingConfig,
    stop_words: HashSet<String>,
}

impl Default for MenuResolver {
    fn default() -> Self {
        Self::new(MatchingConfig::default())
    }
}

impl MenuResolver {
    /// Resolver with the built-in stop words plus `config.extra_stop_words`
    pub fn new(config: MatchingConfig) -> Self {
        let stop_words = DEFAULT_STOP_WORDS
            .iter()
            .map(|w| w.to_string())
            .chain(config.extra_stop_words.iter().map(|w| normalize(w)))
            .filter(|w| !w.is_empty())
            .collect();

        Self { config, stop_words }
    }

    /// Also treat the cuisine profile's stop words as conversational
    pub fn with_cuisine(mut self, profile: &CuisineProfile) -> Self {
        self.stop_words.extend(
            profile
                .stop_words
                .iter()
                .map(|w| normalize(w))
                .filter(|w| !w.is_empty()),
        );
        self
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    pub fn is_stop_word(&self, transcript: &str) -> bool {
        self.stop_words.contains(&normalize(transcript))
    }

    /// All items scored and sorted by descending score
    ///
    /// Ties keep catalog order.
    pub fn rank(&self, transcript: &str, catalog: &[MenuItem]) -> Vec<ScoredCandidate> {
        let prepared = PreparedTranscript::new(transcript);
        self.rank_prepared(&prepared, catalog)
    }

    fn rank_prepared(
        &self,
        transcript: &PreparedTranscript,
        catalog: &[MenuItem],
    ) -> Vec<ScoredCandidate> {
        let mut ranked: Vec<ScoredCandidate> = catalog
            .iter()
            .map(|item| {
                let (score, breakdown) = score_item(transcript, item, &self.config);
                ScoredCandidate {
                    item: item.clone(),
                    score,
                    breakdown,
                }
            })
            .collect();

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }

    /// Resolve a transcript against the current catalog
    pub fn resolve(&self, transcript: &str, catalog: &[MenuItem]) -> ResolutionResult {
        let prepared = PreparedTranscript::new(transcript);

        if prepared.is_empty() {
            tracing::debug!("Empty transcript after normalization");
            return ResolutionResult::NoResult;
        }
        if self.stop_words.contains(&prepared.normalized) {
            tracing::debug!(transcript = %prepared.normalized, "Stop word, not resolving");
            return ResolutionResult::NoResult;
        }

        let ranked = self.rank_prepared(&prepared, catalog);
        let mut iter = ranked.into_iter();

        let top = match iter.next() {
            Some(top) => top,
            None => {
                tracing::debug!("Empty catalog");
                return ResolutionResult::NoResult;
            }
        };
        let runner_up = iter.next();

        tracing::debug!(
            transcript = %prepared.normalized,
            candidates = catalog.len(),
            top_item = %top.item.name,
            score = top.score,
            "Ranked candidates"
        );

        if top.score < self.config.min_score {
            let threshold = self.config.suggestion_threshold;
            let items: Vec<MenuItem> = std::iter::once(top)
                .chain(runner_up)
                .chain(iter)
                .take_while(|c| c.score >= threshold)
                .take(self.config.max_suggestions)
                .map(|c| c.item)
                .collect();

            if items.is_empty() {
                tracing::debug!(transcript = %prepared.normalized, "Below suggestion threshold");
                return ResolutionResult::NoResult;
            }

            tracing::debug!(count = items.len(), "Below match threshold, suggesting");
            return ResolutionResult::Suggestions { items };
        }

        if top.score >= PERFECT_SCORE {
            tracing::debug!(item = %top.item.name, "Perfect match");
            return ResolutionResult::Matched {
                item: top.item,
                score: top.score,
            };
        }

        if let Some(second) = runner_up {
            if top.score - second.score < self.config.ambiguity_margin {
                tracing::debug!(
                    first = %top.item.name,
                    second = %second.item.name,
                    gap = top.score - second.score,
                    "Ambiguous match"
                );
                return ResolutionResult::Ambiguous {
                    first: top.item,
                    second: second.item,
                };
            }
        }

        tracing::debug!(item = %top.item.name, score = top.score, "Matched");
        ResolutionResult::Matched {
            item: top.item,
            score: top.score,
        }
    }
}
