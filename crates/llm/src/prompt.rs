//! Prompt building
//!
//! Chat message types shared by all backends, and the enrichment prompt sent
//! for each batch of catalog items.

use serde::{Deserialize, Serialize};
use std::fmt;

use menu_voice_core::RawMenuItem;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
        }
    }
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

const ENRICHMENT_SYSTEM_PROMPT: &str = "You are a culinary data assistant for a restaurant voice \
ordering system. For every menu item you are given, infer:
- dietary_tags: allergen and diet labels drawn from nuts, dairy, gluten, shellfish, vegan_unfriendly
- ingredients_implied: the main ingredients a typical recipe uses
- phonetic_correction: a lowercase simplified spelling of how the name is spoken
- stt_keywords: 2 or 3 alternate spellings a speech recognizer might produce for the name

Reply with a JSON array only, one object per item, in the same order as the input. Each object \
must copy the item name exactly into \"originalName\" and use the keys \"dietary_tags\", \
\"ingredients_implied\", \"phonetic_correction\" and \"stt_keywords\". Do not add commentary.";

/// Payload entry sent for one item
#[derive(Debug, Serialize)]
struct PromptItem<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

/// Build the chat messages for one enrichment batch
pub fn enrichment_messages(items: &[RawMenuItem]) -> Vec<Message> {
    let payload: Vec<PromptItem<'_>> = items
        .iter()
        .map(|item| PromptItem {
            name: &item.name,
            description: item
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty()),
        })
        .collect();

    // Serializing plain string fields cannot fail
    let items_json = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| "[]".to_string());

    vec![
        Message::system(ENRICHMENT_SYSTEM_PROMPT),
        Message::user(format!("Menu items:\n{}", items_json)),
    ]
}
