//! Domain configuration loaded from YAML
//!
//! - `cuisine` - cuisine profiles (phonetic alias pairs, extra stop words)
//! - `dietary` - restriction categories and their high-risk substrings
//! - `vocabulary` - recognizer vocabulary extraction rules

pub mod cuisine;
pub mod dietary;
pub mod vocabulary;

pub use cuisine::{CuisineProfile, PhoneticAlias};
pub use dietary::{CategoryRules, DietaryConfig, RestrictionCategory};
pub use vocabulary::VocabularyConfig;

use serde::de::DeserializeOwned;
use std::path::Path;

use crate::ConfigError;

/// Read and parse a YAML file
pub(crate) fn load_yaml<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::FileNotFound(format!("{}: {}", path.display(), e)))?;

    serde_yaml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))
}
