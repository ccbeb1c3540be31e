//! Order session
//!
//! The boundary between an utterance and the cart. A transcript is resolved
//! against the merged catalog, and a confident match is then checked against
//! every allergy the customer has declared in this session. Only an
//! `Accept` decision may mutate the cart.

use serde::Serialize;
use std::sync::Arc;

use menu_voice_core::{AllergyDeclarations, MenuItem, ResolutionResult};
use menu_voice_text_processing::{DietarySafetyValidator, MenuResolver};

/// What the dialogue layer should do with an utterance
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum OrderDecision {
    /// Add the item to the cart
    Accept { item: MenuItem, score: f64 },
    /// Matched, but unsafe for a declared allergy
    SafetyBlocked { item: MenuItem, reason: String },
    /// Ask which of the two was meant
    Ambiguous { first: MenuItem, second: MenuItem },
    /// Offer these as "did you mean"
    Suggest { items: Vec<MenuItem> },
    NoResult,
}

impl OrderDecision {
    pub fn permits_cart_mutation(&self) -> bool {
        matches!(self, Self::Accept { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Accept { .. } => "accept",
            Self::SafetyBlocked { .. } => "safety_blocked",
            Self::Ambiguous { .. } => "ambiguous",
            Self::Suggest { .. } => "suggest",
            Self::NoResult => "no_result",
        }
    }
}

pub struct OrderSession {
    id: String,
    catalog_id: String,
    resolver: Arc<MenuResolver>,
    validator: Arc<DietarySafetyValidator>,
    allergies: AllergyDeclarations,
}

impl OrderSession {
    pub fn new(
        id: impl Into<String>,
        catalog_id: impl Into<String>,
        resolver: Arc<MenuResolver>,
        validator: Arc<DietarySafetyValidator>,
    ) -> Self {
        Self {
            id: id.into(),
            catalog_id: catalog_id.into(),
            resolver,
            validator,
            allergies: AllergyDeclarations::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn catalog_id(&self) -> &str {
        &self.catalog_id
    }

    /// Record a declared allergy or restriction
    ///
    /// Returns false for blanks and repeats.
    pub fn declare_allergy(&mut self, restriction: &str) -> bool {
        let added = self.allergies.declare(restriction);
        if added {
            tracing::info!(
                session_id = %self.id,
                restriction,
                categories = ?self.validator.categorize_restriction(restriction),
                "Allergy declared"
            );
        }
        added
    }

    pub fn allergies(&self) -> &AllergyDeclarations {
        &self.allergies
    }

    /// Resolve a transcript and gate the match on declared allergies
    pub fn evaluate(&self, transcript: &str, catalog: &[MenuItem]) -> OrderDecision {
        let decision = match self.resolver.resolve(transcript, catalog) {
            ResolutionResult::Matched { item, score } => {
                let verdict = self.validator.validate(&item, self.allergies.as_set());
                if verdict.is_safe() {
                    OrderDecision::Accept { item, score }
                } else {
                    OrderDecision::SafetyBlocked {
                        item,
                        reason: verdict.reason.unwrap_or_default(),
                    }
                }
            }
            ResolutionResult::Ambiguous { first, second } => {
                OrderDecision::Ambiguous { first, second }
            }
            ResolutionResult::Suggestions { items } => OrderDecision::Suggest { items },
            ResolutionResult::NoResult => OrderDecision::NoResult,
        };

        tracing::debug!(
            session_id = %self.id,
            catalog_id = %self.catalog_id,
            transcript,
            decision = decision.kind(),
            "Utterance evaluated"
        );

        decision
    }

    /// End the session; declared allergies do not outlive it
    pub fn end(&mut self) {
        tracing::debug!(session_id = %self.id, allergies = self.allergies.len(), "Session ended");
        self.allergies.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> OrderSession {
        OrderSession::new(
            "sess-1",
            "store-1",
            Arc::new(MenuResolver::default()),
            Arc::new(DietarySafetyValidator::default()),
        )
    }

    fn catalog() -> Vec<MenuItem> {
        vec![
            MenuItem::new("1", "Malai Kofta", 1299)
                .with_phonetic_name("malai kofta")
                .with_dietary_tags(["dairy", "nuts"]),
            MenuItem::new("2", "Garlic Naan", 399).with_dietary_tags(["gluten"]),
            MenuItem::new("3", "Lamb Curry Bowl", 1499),
            MenuItem::new("4", "Lamb Curry Plate", 1699),
        ]
    }

    #[test]
    fn test_accept_without_allergies() {
        let session = session();
        let decision = session.evaluate("Malai Kofta", &catalog());
        assert!(decision.permits_cart_mutation());
        match decision {
            OrderDecision::Accept { item, score } => {
                assert_eq!(item.id, "1");
                assert!(score >= 0.55);
            }
            other => panic!("expected accept, got {:?}", other),
        }
    }

    #[test]
    fn test_declared_allergy_blocks_match() {
        let mut session = session();
        assert!(session.declare_allergy("Nuts"));
        assert!(!session.declare_allergy("nuts"));

        let decision = session.evaluate("malai kofta", &catalog());
        assert!(!decision.permits_cart_mutation());
        match decision {
            OrderDecision::SafetyBlocked { item, reason } => {
                assert_eq!(item.id, "1");
                assert!(!reason.is_empty());
            }
            other => panic!("expected safety block, got {:?}", other),
        }

        // Unrelated item is still fine
        assert!(session
            .evaluate("garlic naan", &catalog())
            .permits_cart_mutation());
    }

    #[test]
    fn test_cashew_variant_blocked_for_nuts() {
        let mut session = session();
        session.declare_allergy("nuts");
        let menu = vec![
            MenuItem::new("bc", "Butter Chicken", 1449),
            MenuItem::new("bcc", "Butter Chicken Cashew", 1699),
        ];

        match session.evaluate("Butter Chicken Cashew", &menu) {
            OrderDecision::SafetyBlocked { item, reason } => {
                assert_eq!(item.id, "bcc");
                assert!(reason.contains("cashew"), "reason: {}", reason);
            }
            other => panic!("expected safety block, got {:?}", other),
        }
        assert!(session
            .evaluate("Butter Chicken", &menu)
            .permits_cart_mutation());
    }

    #[test]
    fn test_ambiguous_and_no_result_do_not_mutate() {
        let session = session();
        let decision = session.evaluate("lamb curry", &catalog());
        assert_eq!(decision.kind(), "ambiguous");
        assert!(!decision.permits_cart_mutation());

        let decision = session.evaluate("checkout", &catalog());
        assert_eq!(decision, OrderDecision::NoResult);
    }

    #[test]
    fn test_end_clears_allergies() {
        let mut session = session();
        session.declare_allergy("dairy");
        assert_eq!(session.allergies().len(), 1);
        session.end();
        assert!(session.allergies().is_empty());
        assert!(session
            .evaluate("malai kofta", &catalog())
            .permits_cart_mutation());
    }

    #[test]
    fn test_decision_serialization_tag() {
        let json = serde_json::to_value(OrderDecision::NoResult).unwrap();
        assert_eq!(json["decision"], "no_result");
    }
}
