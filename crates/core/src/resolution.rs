//! Resolution outcomes
//!
//! A resolution attempt produces exactly one outcome. Modelling it as an enum
//! makes "more than one non-empty outcome" unrepresentable.

use serde::{Deserialize, Serialize};

use crate::menu::MenuItem;

/// Outcome of matching one transcript against a catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResolutionResult {
    /// A single confident match
    Matched { item: MenuItem, score: f64 },
    /// Two items scored within the ambiguity margin
    Ambiguous { first: MenuItem, second: MenuItem },
    /// Nothing cleared the match threshold; these cleared the suggestion floor
    Suggestions { items: Vec<MenuItem> },
    /// Nothing usable; ask the user to repeat or rephrase
    NoResult,
}

impl ResolutionResult {
    pub fn matched(&self) -> Option<(&MenuItem, f64)> {
        match self {
            Self::Matched { item, score } => Some((item, *score)),
            _ => None,
        }
    }

    pub fn ambiguous_pair(&self) -> Option<(&MenuItem, &MenuItem)> {
        match self {
            Self::Ambiguous { first, second } => Some((first, second)),
            _ => None,
        }
    }

    /// Suggested items; empty for every other outcome
    pub fn suggestions(&self) -> &[MenuItem] {
        match self {
            Self::Suggestions { items } => items,
            _ => &[],
        }
    }

    pub fn is_no_result(&self) -> bool {
        matches!(self, Self::NoResult)
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Matched { .. } => "matched",
            Self::Ambiguous { .. } => "ambiguous",
            Self::Suggestions { .. } => "suggestions",
            Self::NoResult => "no_result",
        }
    }
}

/// Per-signal scores behind a candidate's final score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalBreakdown {
    pub phonetic: f64,
    pub token: f64,
    pub keyword: f64,
    /// Weighted sum of the three signals
    pub weighted: f64,
    /// Direct-match bonus (exact / prefix / substring on the raw name)
    pub direct: f64,
}

/// Candidate with its fused score, used for ranking and diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub item: MenuItem,
    pub score: f64,
    pub breakdown: SignalBreakdown,
}
