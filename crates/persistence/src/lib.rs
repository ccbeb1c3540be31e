//! Enrichment persistence
//!
//! Provides:
//! - `InMemoryEnrichmentStore` - concurrent key-value store keyed by
//!   (catalog, item), with a case-insensitive name index
//! - JSON snapshots so enrichment survives restarts without re-prompting
//!   the generative backend

pub mod error;
pub mod snapshot;
pub mod store;

pub use error::PersistenceError;
pub use snapshot::Snapshot;
pub use store::InMemoryEnrichmentStore;
