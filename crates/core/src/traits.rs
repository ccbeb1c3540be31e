//! Pluggable seams
//!
//! - `MenuEnricher` - the external generative backend that infers allergens,
//!   ingredients and phonetic aliases for a batch of catalog items
//! - `EnrichmentStore` - key-value store for persisted enrichment, keyed by
//!   (catalog, item). Reads never touch the network.

use async_trait::async_trait;

use crate::enrichment::{EnrichmentRecord, ItemEnrichment};
use crate::menu::RawMenuItem;
use crate::Result;

/// Generative enrichment backend
///
/// Implementations:
/// - `LlmMenuEnricher` - prompts an `LlmBackend` and parses its JSON reply
#[async_trait]
pub trait MenuEnricher: Send + Sync + 'static {
    /// Infer enrichment for one batch of items.
    ///
    /// A failed call or an unparseable reply returns `Error::Enrichment`;
    /// callers treat that as a no-op for the batch.
    async fn enrich_batch(&self, items: &[RawMenuItem]) -> Result<Vec<EnrichmentRecord>>;

    /// Backend name for logs
    fn name(&self) -> &str;
}

/// Persisted enrichment, keyed by catalog and item identity
///
/// Upserts replace a whole item record at once, so a concurrent reader sees
/// either the previous record or the new one, never a mix.
pub trait EnrichmentStore: Send + Sync {
    /// Look up by catalog item identifier
    fn get(&self, catalog_id: &str, item_id: &str) -> Option<ItemEnrichment>;

    /// Case-insensitive lookup by item name
    fn get_by_name(&self, catalog_id: &str, name: &str) -> Option<ItemEnrichment>;

    /// Insert or overwrite the record for `enrichment.item_id`
    fn upsert(&self, catalog_id: &str, enrichment: ItemEnrichment);

    /// Number of enriched items stored for a catalog
    fn catalog_len(&self, catalog_id: &str) -> usize;

    /// Make stored state durable, if the implementation supports it
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}
