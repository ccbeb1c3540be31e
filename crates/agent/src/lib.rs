//! Ordering agent
//!
//! Features:
//! - Background menu enrichment with per-batch failure isolation
//! - Non-blocking merge of persisted enrichment into catalog items
//! - Order sessions that resolve utterances and gate cart mutations on
//!   the customer's declared allergies
//! - `MenuEngine` bundling the resolver, validator and vocabulary extractor
//!   built from settings

pub mod engine;
pub mod enrichment;
pub mod session;

pub use engine::{MenuEngine, Vocabulary};
pub use enrichment::{merge_enrichment, EnrichmentReport, MenuEnrichmentService};
pub use session::{OrderDecision, OrderSession};
