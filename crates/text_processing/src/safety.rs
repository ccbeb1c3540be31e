//! Dietary safety validator
//!
//! Two layers, both must pass:
//! - enrichment tags compared against each declared restriction and the
//!   canonical categories it maps to
//! - the static risk table matched against the item name, which runs even
//!   when the item has never been enriched
//!
//! A restriction that maps to no known category cannot be verified by the
//! static table and passes it.

use std::collections::BTreeSet;

use menu_voice_config::{DietaryConfig, RestrictionCategory};
use menu_voice_core::{MenuItem, SafetyVerdict};

use crate::normalize::normalize;

#[derive(Debug, Clone, Default)]
pub struct DietarySafetyValidator {
    table: DietaryConfig,
}

impl DietarySafetyValidator {
    pub fn new(table: DietaryConfig) -> Self {
        Self { table }
    }

    /// Map free-text restriction to zero or more canonical categories
    pub fn categorize_restriction(&self, restriction: &str) -> Vec<RestrictionCategory> {
        let text = normalize(restriction);
        if text.is_empty() {
            return Vec::new();
        }

        self.table
            .categories
            .iter()
            .filter(|rules| {
                text.contains(&normalize(rules.category.as_str()))
                    || rules
                        .sniff_keywords
                        .iter()
                        .map(|k| normalize(k))
                        .any(|k| !k.is_empty() && text.contains(&k))
            })
            .map(|rules| rules.category)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Check an item against every active restriction
    pub fn validate<'a, I>(&self, item: &MenuItem, allergies: I) -> SafetyVerdict
    where
        I: IntoIterator<Item = &'a String>,
    {
        for allergy in allergies {
            let restriction = normalize(allergy);
            if restriction.is_empty() {
                continue;
            }

            let categories = self.categorize_restriction(&restriction);

            if let Some(reason) = self.check_tags(item, &restriction, &categories) {
                tracing::info!(item = %item.name, allergy = %restriction, "Blocked by dietary tag");
                return SafetyVerdict::blocked(reason);
            }

            if let Some(reason) = self.check_name(item, &restriction, &categories) {
                tracing::info!(item = %item.name, allergy = %restriction, "Blocked by risk table");
                return SafetyVerdict::blocked(reason);
            }
        }

        SafetyVerdict::safe()
    }

    fn check_tags(
        &self,
        item: &MenuItem,
        restriction: &str,
        categories: &[RestrictionCategory],
    ) -> Option<String> {
        let tags = item.dietary_tags.as_ref()?;

        let mut targets: Vec<String> = vec![restriction.to_string()];
        targets.extend(categories.iter().map(|c| normalize(c.as_str())));

        tags.iter().find_map(|tag| {
            let tag_norm = normalize(tag);
            if tag_norm.is_empty() {
                return None;
            }
            targets
                .iter()
                .any(|t| tag_norm.contains(t.as_str()) || t.contains(tag_norm.as_str()))
                .then(|| {
                    format!(
                        "{} is tagged '{}', which conflicts with your {} restriction",
                        item.name, tag, restriction
                    )
                })
        })
    }

    fn check_name(
        &self,
        item: &MenuItem,
        restriction: &str,
        categories: &[RestrictionCategory],
    ) -> Option<String> {
        let name = normalize(&item.name);

        categories.iter().find_map(|category| {
            let rules = self.table.rules_for(*category)?;
            rules
                .risk_substrings
                .iter()
                .find(|risk| {
                    let risk = normalize(risk);
                    !risk.is_empty() && name.contains(&risk)
                })
                .map(|risk| {
                    format!(
                        "{} likely contains '{}', which conflicts with your {} restriction",
                        item.name, risk, restriction
                    )
                })
        })
    }
}
