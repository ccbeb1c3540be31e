//! Voice order resolution for the menu voice engine
//!
//! This crate holds the pure, synchronous half of the engine:
//! - **Normalization**: case-folding and symbol stripping shared by all scorers
//! - **Phonetic encoding**: double-metaphone style consonant skeletons
//! - **Scoring**: phonetic, per-token and keyword signals plus the direct bonus
//! - **Resolution**: weighted fusion and the reject/suggest/ambiguous/match gates
//! - **Safety**: dietary tag and static risk-table checks
//! - **Vocabulary**: the keyword bias list for the speech recognizer
//!
//! Nothing here performs I/O or holds shared mutable state, so every type can
//! be shared across concurrent sessions.
//!
//! # Example
//!
//! ```ignore
//! use menu_voice_text_processing::MenuResolver;
//!
//! let resolver = MenuResolver::default();
//! let result = resolver.resolve("malay costa", &catalog);
//! ```

pub mod edit_distance;
pub mod normalize;
pub mod phonetic;
pub mod resolver;
pub mod safety;
pub mod scoring;
pub mod vocabulary;

pub use edit_distance::{levenshtein, similarity};
pub use normalize::normalize;
pub use phonetic::{encode, PhoneticCodes};
pub use resolver::{MenuResolver, DEFAULT_STOP_WORDS};
pub use safety::DietarySafetyValidator;
pub use scoring::PreparedTranscript;
pub use vocabulary::VocabularyExtractor;
