//! Engine assembly
//!
//! Builds the stateless matching components once from settings and hands
//! out sessions that share them.

use serde::Serialize;
use std::sync::Arc;

use menu_voice_config::{ConfigError, CuisineProfile, Settings};
use menu_voice_core::MenuItem;
use menu_voice_text_processing::{DietarySafetyValidator, MenuResolver, VocabularyExtractor};

use crate::session::OrderSession;

/// Recognizer bias list for one catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vocabulary {
    pub keywords: Vec<String>,
    pub boost_terms: Vec<(String, f64)>,
}

#[derive(Clone)]
pub struct MenuEngine {
    resolver: Arc<MenuResolver>,
    validator: Arc<DietarySafetyValidator>,
    extractor: Arc<VocabularyExtractor>,
    profile: Arc<CuisineProfile>,
}

impl MenuEngine {
    pub fn new(settings: &Settings) -> Result<Self, ConfigError> {
        let profile = settings.cuisine_profile()?;
        let resolver = MenuResolver::new(settings.matching.clone()).with_cuisine(&profile);

        tracing::info!(
            cuisine = %profile.cuisine,
            aliases = profile.phonetic_aliases.len(),
            min_score = settings.matching.min_score,
            "Menu engine ready"
        );

        Ok(Self {
            resolver: Arc::new(resolver),
            validator: Arc::new(DietarySafetyValidator::new(settings.dietary.clone())),
            extractor: Arc::new(VocabularyExtractor::new(settings.vocabulary.clone())),
            profile: Arc::new(profile),
        })
    }

    pub fn resolver(&self) -> &MenuResolver {
        &self.resolver
    }

    pub fn validator(&self) -> &DietarySafetyValidator {
        &self.validator
    }

    pub fn cuisine(&self) -> &CuisineProfile {
        &self.profile
    }

    /// Open a session with a fresh allergy set
    pub fn start_session(&self, catalog_id: impl Into<String>) -> OrderSession {
        OrderSession::new(
            uuid::Uuid::new_v4().to_string(),
            catalog_id,
            Arc::clone(&self.resolver),
            Arc::clone(&self.validator),
        )
    }

    pub fn vocabulary(&self, items: &[MenuItem]) -> Vocabulary {
        let keywords = self.extractor.extract_keywords(items, &self.profile);
        let boost_terms = self.extractor.boost_terms(&keywords);
        Vocabulary {
            keywords,
            boost_terms,
        }
    }
}
