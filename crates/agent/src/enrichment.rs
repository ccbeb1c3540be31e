//! Menu enrichment service
//!
//! `enrich` is the slow write path: it batches raw items through the
//! generative backend and upserts whatever comes back. `merge` is the read
//! path used while serving a call and only touches the store.
//!
//! A batch that fails leaves the stored enrichment for its items as it was.
//! Runs are eventually consistent with `merge`: a caller may see some items
//! enriched and others not while a run is in flight.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::Instrument;

use menu_voice_core::{
    EnrichmentRecord, EnrichmentStore, ItemEnrichment, MenuEnricher, MenuItem, RawMenuItem,
};

/// Outcome of one enrichment run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentReport {
    pub batches: usize,
    pub failed_batches: usize,
    pub enriched_items: usize,
    /// Items in failed batches or without a usable record
    pub skipped_items: usize,
}

pub struct MenuEnrichmentService {
    enricher: Arc<dyn MenuEnricher>,
    store: Arc<dyn EnrichmentStore>,
    batch_size: usize,
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl MenuEnrichmentService {
    /// A zero `batch_size` is treated as 1
    pub fn new(
        enricher: Arc<dyn MenuEnricher>,
        store: Arc<dyn EnrichmentStore>,
        batch_size: usize,
    ) -> Self {
        Self {
            enricher,
            store,
            batch_size: batch_size.max(1),
        }
    }

    pub fn store(&self) -> &Arc<dyn EnrichmentStore> {
        &self.store
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Enrich a catalog, batch by batch
    ///
    /// Never fails as a whole; per-batch failures are logged and counted.
    pub async fn enrich(&self, catalog_id: &str, items: &[RawMenuItem]) -> EnrichmentReport {
        let mut report = EnrichmentReport::default();

        tracing::info!(
            catalog_id,
            items = items.len(),
            batch_size = self.batch_size,
            enricher = self.enricher.name(),
            "Starting menu enrichment"
        );

        for (batch, chunk) in items.chunks(self.batch_size).enumerate() {
            report.batches += 1;

            let records = match self.enricher.enrich_batch(chunk).await {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(
                        catalog_id,
                        batch,
                        items = chunk.len(),
                        error = %e,
                        "Enrichment batch failed, skipping"
                    );
                    report.failed_batches += 1;
                    report.skipped_items += chunk.len();
                    continue;
                }
            };

            let enriched = self.store_batch(catalog_id, chunk, &records);
            report.enriched_items += enriched;
            report.skipped_items += chunk.len() - enriched;

            tracing::debug!(catalog_id, batch, enriched, items = chunk.len(), "Batch stored");
        }

        if let Err(e) = self.store.flush() {
            tracing::warn!(catalog_id, error = %e, "Failed to flush enrichment store");
        }

        tracing::info!(
            catalog_id,
            batches = report.batches,
            failed_batches = report.failed_batches,
            enriched = report.enriched_items,
            skipped = report.skipped_items,
            "Menu enrichment finished"
        );

        report
    }

    /// Match records back to the batch by name and upsert them
    ///
    /// Returns the number of items stored. Records naming an item outside
    /// the batch are ignored, as is a second record for the same item.
    fn store_batch(
        &self,
        catalog_id: &str,
        chunk: &[RawMenuItem],
        records: &[EnrichmentRecord],
    ) -> usize {
        let mut by_name: HashMap<String, &RawMenuItem> =
            chunk.iter().map(|raw| (name_key(&raw.name), raw)).collect();

        let mut stored = 0;
        for record in records {
            let Some(name) = record.original_name() else {
                continue;
            };
            let Some(raw) = by_name.remove(&name_key(name)) else {
                tracing::debug!(catalog_id, name, "Enrichment record matches no item in batch");
                continue;
            };
            let Some(mut enrichment) = ItemEnrichment::from_record(raw.id.clone(), record) else {
                continue;
            };
            enrichment.original_name = raw.name.clone();

            tracing::trace!(catalog_id, item_id = %raw.id, "Storing enrichment");
            self.store.upsert(catalog_id, enrichment);
            stored += 1;
        }
        stored
    }

    /// Run `enrich` on the runtime without waiting for it
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn_enrich(
        self: &Arc<Self>,
        catalog_id: String,
        items: Vec<RawMenuItem>,
    ) -> JoinHandle<EnrichmentReport> {
        let service = Arc::clone(self);
        let span = tracing::info_span!("enrichment", catalog_id = %catalog_id);
        tokio::spawn(async move { service.enrich(&catalog_id, &items).await }.instrument(span))
    }

    /// Attach stored enrichment to raw items; see [`merge_enrichment`]
    pub fn merge(&self, catalog_id: &str, items: &[RawMenuItem]) -> Vec<MenuItem> {
        merge_enrichment(self.store.as_ref(), catalog_id, items)
    }
}

/// Attach stored enrichment to raw items
///
/// Looks up by item id, then by case-insensitive name. Items without
/// stored enrichment pass through unchanged. Reads only the store.
pub fn merge_enrichment(
    store: &dyn EnrichmentStore,
    catalog_id: &str,
    items: &[RawMenuItem],
) -> Vec<MenuItem> {
    items
        .iter()
        .map(|raw| {
            let item = MenuItem::from(raw);
            match store
                .get(catalog_id, &raw.id)
                .or_else(|| store.get_by_name(catalog_id, &raw.name))
            {
                Some(enrichment) => item.apply_enrichment(&enrichment),
                None => item,
            }
        })
        .collect()
}
