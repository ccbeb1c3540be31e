//! In-memory enrichment store
//!
//! Records are keyed by (catalog, item id). A second index maps
//! (catalog, lowercased name) to the item id so `merge` can fall back to a
//! name lookup when a catalog sync reissues identifiers.
//!
//! Each upsert replaces one record as a unit; readers never see a partially
//! written record. No cross-item transaction is offered.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use menu_voice_core::{EnrichmentStore, ItemEnrichment};

use crate::snapshot::Snapshot;
use crate::PersistenceError;

type Key = (String, String);

pub struct InMemoryEnrichmentStore {
    records: DashMap<Key, ItemEnrichment>,
    names: DashMap<Key, String>,
    snapshot_path: Option<PathBuf>,
    /// Serializes snapshot writers
    flush_lock: Mutex<()>,
}

impl Default for InMemoryEnrichmentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl InMemoryEnrichmentStore {
    /// Volatile store; `flush` is a no-op
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            names: DashMap::new(),
            snapshot_path: None,
            flush_lock: Mutex::new(()),
        }
    }

    /// Store backed by a JSON snapshot
    ///
    /// Loads the snapshot when it exists; a missing file starts empty.
    pub fn with_snapshot(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        let mut store = Self::new();

        if let Some(snapshot) = Snapshot::load(&path)? {
            tracing::info!(
                path = %path.display(),
                catalogs = snapshot.catalogs.len(),
                records = snapshot.record_count(),
                "Loaded enrichment snapshot"
            );
            for (catalog_id, records) in snapshot.catalogs {
                for record in records {
                    store.insert(&catalog_id, record);
                }
            }
        } else {
            tracing::info!(path = %path.display(), "No enrichment snapshot, starting empty");
        }

        store.snapshot_path = Some(path);
        Ok(store)
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// Total records across all catalogs
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn insert(&self, catalog_id: &str, enrichment: ItemEnrichment) {
        let key = (catalog_id.to_string(), enrichment.item_id.clone());

        if let Some(previous) = self.records.get(&key) {
            let old_name = name_key(&previous.original_name);
            let new_name = name_key(&enrichment.original_name);
            drop(previous);
            if old_name != new_name {
                self.names.remove_if(&(catalog_id.to_string(), old_name), |_, id| {
                    *id == enrichment.item_id
                });
            }
        }

        self.names.insert(
            (catalog_id.to_string(), name_key(&enrichment.original_name)),
            enrichment.item_id.clone(),
        );
        self.records.insert(key, enrichment);
    }

    fn to_snapshot(&self) -> Snapshot {
        let mut catalogs: BTreeMap<String, Vec<ItemEnrichment>> = BTreeMap::new();
        for entry in self.records.iter() {
            catalogs
                .entry(entry.key().0.clone())
                .or_default()
                .push(entry.value().clone());
        }
        for records in catalogs.values_mut() {
            records.sort_by(|a, b| a.item_id.cmp(&b.item_id));
        }
        Snapshot::new(catalogs)
    }
}

impl EnrichmentStore for InMemoryEnrichmentStore {
    fn get(&self, catalog_id: &str, item_id: &str) -> Option<ItemEnrichment> {
        self.records
            .get(&(catalog_id.to_string(), item_id.to_string()))
            .map(|r| r.value().clone())
    }

    fn get_by_name(&self, catalog_id: &str, name: &str) -> Option<ItemEnrichment> {
        let item_id = self
            .names
            .get(&(catalog_id.to_string(), name_key(name)))
            .map(|id| id.value().clone())?;
        self.get(catalog_id, &item_id)
    }

    fn upsert(&self, catalog_id: &str, enrichment: ItemEnrichment) {
        tracing::trace!(catalog_id, item_id = %enrichment.item_id, "Upserting enrichment");
        self.insert(catalog_id, enrichment);
    }

    fn catalog_len(&self, catalog_id: &str) -> usize {
        self.records
            .iter()
            .filter(|entry| entry.key().0 == catalog_id)
            .count()
    }

    fn flush(&self) -> menu_voice_core::Result<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let _guard = self.flush_lock.lock();
        let snapshot = self.to_snapshot();
        snapshot.save(path)?;

        tracing::debug!(
            path = %path.display(),
            records = snapshot.record_count(),
            "Enrichment snapshot written"
        );
        Ok(())
    }
}
