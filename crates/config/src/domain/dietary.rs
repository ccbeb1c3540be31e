//! Dietary restriction table
//!
//! Maps canonical restriction categories to:
//! - sniff keywords used to classify a customer's free-text restriction
//!   ("lactose intolerant" -> dairy)
//! - high-risk substrings looked for in an item's name when enrichment tags
//!   are missing or incomplete
//!
//! This table is the last line of defence; it runs for every item whether or
//! not enrichment has completed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use super::load_yaml;
use crate::ConfigError;

/// Canonical restriction categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionCategory {
    Nuts,
    Dairy,
    Gluten,
    Shellfish,
    VeganUnfriendly,
}

impl RestrictionCategory {
    pub const ALL: [RestrictionCategory; 5] = [
        Self::Nuts,
        Self::Dairy,
        Self::Gluten,
        Self::Shellfish,
        Self::VeganUnfriendly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nuts => "nuts",
            Self::Dairy => "dairy",
            Self::Gluten => "gluten",
            Self::Shellfish => "shellfish",
            Self::VeganUnfriendly => "vegan_unfriendly",
        }
    }
}

impl fmt::Display for RestrictionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rules for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRules {
    pub category: RestrictionCategory,
    /// Words in a declared restriction that map it to this category
    #[serde(default)]
    pub sniff_keywords: Vec<String>,
    /// Substrings of an item name that signal this category
    #[serde(default)]
    pub risk_substrings: Vec<String>,
}

impl CategoryRules {
    fn new(category: RestrictionCategory, sniff: &[&str], risk: &[&str]) -> Self {
        Self {
            category,
            sniff_keywords: sniff.iter().map(|s| s.to_string()).collect(),
            risk_substrings: risk.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Full dietary table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietaryConfig {
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryRules>,
}

impl Default for DietaryConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
        }
    }
}

fn default_categories() -> Vec<CategoryRules> {
    use RestrictionCategory::*;

    vec![
        CategoryRules::new(
            Nuts,
            &[
                "nut", "peanut", "almond", "cashew", "pistachio", "walnut", "pecan", "hazelnut",
            ],
            &[
                "korma", "cashew", "peanut", "almond", "pistachio", "walnut", "pecan",
                "hazelnut", "satay", "praline", "badam", "kaju", "pesto",
            ],
        ),
        CategoryRules::new(
            Dairy,
            &["dairy", "lactose", "milk", "cheese", "cream", "casein", "whey"],
            &[
                "paneer", "butter", "cream", "cheese", "malai", "ghee", "lassi", "kheer",
                "raita", "makhani", "korma", "kulfi", "yogurt", "dahi",
            ],
        ),
        CategoryRules::new(
            Gluten,
            &["gluten", "wheat", "celiac", "coeliac"],
            &[
                "naan", "roti", "paratha", "kulcha", "bread", "wheat", "samosa", "pasta",
                "noodle", "bhatura", "puri", "chapati", "pakora",
            ],
        ),
        CategoryRules::new(
            Shellfish,
            &["shellfish", "shrimp", "prawn", "crab", "lobster", "seafood"],
            &[
                "prawn", "shrimp", "crab", "lobster", "scallop", "jhinga", "mussel", "oyster",
                "clam",
            ],
        ),
        CategoryRules::new(
            VeganUnfriendly,
            &["vegan", "plant based", "plantbased"],
            &[
                "chicken", "lamb", "mutton", "goat", "fish", "prawn", "shrimp", "egg",
                "paneer", "butter", "ghee", "cream", "beef", "pork", "keema", "malai",
                "lassi", "cheese",
            ],
        ),
    ]
}

impl DietaryConfig {
    /// Load a dietary table from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        load_yaml(path)
    }

    pub fn rules_for(&self, category: RestrictionCategory) -> Option<&CategoryRules> {
        self.categories.iter().find(|r| r.category == category)
    }
}
