//! Core traits and types for the voice ordering engine
//!
//! This crate provides the foundational types shared by every other crate:
//! - Catalog types (raw POS items, enriched menu items, enrichment records)
//! - Resolution outcomes produced by the matcher
//! - Dietary safety verdicts and the session-scoped allergy set
//! - Seam traits for the enrichment backend and the enrichment store
//! - Error types

pub mod allergy;
pub mod enrichment;
pub mod error;
pub mod menu;
pub mod resolution;
pub mod safety;
pub mod traits;

pub use allergy::AllergyDeclarations;
pub use enrichment::{EnrichmentRecord, ItemEnrichment};
pub use error::{Error, Result};
pub use menu::{MenuItem, RawMenuItem};
pub use resolution::{ResolutionResult, ScoredCandidate, SignalBreakdown};
pub use safety::SafetyVerdict;
pub use traits::{EnrichmentStore, MenuEnricher};
