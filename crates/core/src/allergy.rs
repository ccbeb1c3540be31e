//! Session-scoped allergy declarations
//!
//! Append-only for the duration of a call; cleared when the call ends.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of normalized restriction strings declared by the customer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllergyDeclarations {
    entries: BTreeSet<String>,
}

impl AllergyDeclarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a restriction. Returns `false` if it was blank or already known.
    pub fn declare(&mut self, restriction: &str) -> bool {
        let normalized = normalize_restriction(restriction);
        if normalized.is_empty() {
            return false;
        }
        self.entries.insert(normalized)
    }

    pub fn contains(&self, restriction: &str) -> bool {
        self.entries.contains(&normalize_restriction(restriction))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn as_set(&self) -> &BTreeSet<String> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every declaration (call ended)
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<S: AsRef<str>> FromIterator<S> for AllergyDeclarations {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut declarations = Self::new();
        for restriction in iter {
            declarations.declare(restriction.as_ref());
        }
        declarations
    }
}

fn normalize_restriction(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
