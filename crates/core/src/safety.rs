//! Dietary safety verdict

use serde::{Deserialize, Serialize};

/// Result of checking an item against declared restrictions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyVerdict {
    pub safe: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SafetyVerdict {
    pub fn safe() -> Self {
        Self {
            safe: true,
            reason: None,
        }
    }

    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            safe: false,
            reason: Some(reason.into()),
        }
    }

    pub fn is_safe(&self) -> bool {
        self.safe
    }
}

impl Default for SafetyVerdict {
    fn default() -> Self {
        Self::safe()
    }
}
