//! Centralized constants
//!
//! Single source of truth for tunable defaults. The matching values were
//! tuned empirically against recorded transcripts; treat any drift as a
//! regression.

/// Resolution engine defaults
pub mod matching {
    /// Weight of the phonetic signal in the fused score
    pub const PHONETIC_WEIGHT: f64 = 0.5;
    /// Weight of the per-token fuzzy signal
    pub const TOKEN_WEIGHT: f64 = 0.4;
    /// Weight of the curated-keyword signal
    pub const KEYWORD_WEIGHT: f64 = 0.1;

    /// Minimum fused score for a match
    pub const MIN_SCORE: f64 = 0.55;
    /// Top-two gap below which the result is ambiguous
    pub const AMBIGUITY_MARGIN: f64 = 0.08;
    /// Lower bound for offering suggestions when nothing matches
    pub const SUGGESTION_THRESHOLD: f64 = 0.35;
    /// Per-token similarity must exceed this to count
    pub const TOKEN_MATCH_FLOOR: f64 = 0.6;
    /// Maximum number of suggestions returned
    pub const MAX_SUGGESTIONS: usize = 2;
    /// Score at or above which the ambiguity check is skipped
    pub const PERFECT_SCORE: f64 = 1.0;

    /// Phonetic score when one code contains the other
    pub const PHONETIC_SUBSTRING_SCORE: f64 = 0.8;
    /// Keyword score on substring containment
    pub const KEYWORD_SUBSTRING_SCORE: f64 = 0.8;

    /// Direct-match bonus values
    pub const DIRECT_EXACT: f64 = 1.0;
    pub const DIRECT_PREFIX: f64 = 0.95;
    pub const DIRECT_SUBSTRING: f64 = 0.85;
}

/// Vocabulary extraction defaults
pub mod vocabulary {
    /// Hard ceiling imposed by the recognizer
    pub const MAX_KEYWORDS: usize = 190;
    /// Items processed per catalog
    pub const MAX_ITEMS: usize = 150;
    /// Minimum length for single-word names and individual tokens
    pub const MIN_TOKEN_LEN: usize = 5;
    /// Minimum length (exclusive) for enrichment-provided terms
    pub const MIN_ENRICHED_TERM_LEN: usize = 2;
    /// Boost weight attached to every extracted term
    pub const DEFAULT_BOOST: f64 = 2.0;
}

/// Enrichment defaults
pub mod enrichment {
    /// Items per generative call
    pub const BATCH_SIZE: usize = 20;
}

/// Service endpoints (defaults for local development)
pub mod endpoints {
    /// Ollama LLM endpoint
    pub const OLLAMA_DEFAULT: &str = "http://localhost:11434";
    /// OpenAI API endpoint
    pub const OPENAI_DEFAULT: &str = "https://api.openai.com/v1";
}
