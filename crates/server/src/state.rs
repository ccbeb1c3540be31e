//! Application State
//!
//! Shared state across all handlers.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

use menu_voice_agent::{merge_enrichment, MenuEngine, MenuEnrichmentService, OrderSession};
use menu_voice_config::Settings;
use menu_voice_core::{EnrichmentStore, MenuEnricher, MenuItem, RawMenuItem};
use menu_voice_llm::LlmBackend;
use menu_voice_persistence::InMemoryEnrichmentStore;

use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub engine: MenuEngine,
    pub store: Arc<dyn EnrichmentStore>,
    /// Absent when enrichment is disabled
    pub enrichment: Option<Arc<MenuEnrichmentService>>,
    /// Backend probed by the readiness check
    pub llm: Option<Arc<dyn LlmBackend>>,
    /// Latest raw catalog per catalog id
    catalogs: Arc<DashMap<String, Arc<Vec<RawMenuItem>>>>,
    sessions: Arc<DashMap<String, Arc<Mutex<OrderSession>>>>,
}

impl AppState {
    /// State with a volatile store and no enrichment
    pub fn new(config: Settings) -> Result<Self, ServerError> {
        Self::with_store(config, Arc::new(InMemoryEnrichmentStore::new()))
    }

    pub fn with_store(
        config: Settings,
        store: Arc<dyn EnrichmentStore>,
    ) -> Result<Self, ServerError> {
        let engine = MenuEngine::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            engine,
            store,
            enrichment: None,
            llm: None,
            catalogs: Arc::new(DashMap::new()),
            sessions: Arc::new(DashMap::new()),
        })
    }

    /// Enable background enrichment through `enricher`
    pub fn with_enricher(mut self, enricher: Arc<dyn MenuEnricher>) -> Self {
        self.enrichment = Some(Arc::new(MenuEnrichmentService::new(
            enricher,
            Arc::clone(&self.store),
            self.config.enrichment.batch_size,
        )));
        self
    }

    pub fn with_llm(mut self, backend: Arc<dyn LlmBackend>) -> Self {
        self.llm = Some(backend);
        self
    }

    /// Replace a catalog's raw items
    pub fn put_catalog(&self, catalog_id: &str, items: Vec<RawMenuItem>) -> Arc<Vec<RawMenuItem>> {
        let items = Arc::new(items);
        self.catalogs.insert(catalog_id.to_string(), Arc::clone(&items));
        items
    }

    pub fn catalog(&self, catalog_id: &str) -> Result<Arc<Vec<RawMenuItem>>, ServerError> {
        self.catalogs
            .get(catalog_id)
            .map(|c| Arc::clone(c.value()))
            .ok_or_else(|| ServerError::CatalogNotFound(catalog_id.to_string()))
    }

    /// Raw catalog with whatever enrichment is stored so far
    pub fn merged_menu(&self, catalog_id: &str) -> Result<Vec<MenuItem>, ServerError> {
        let raw = self.catalog(catalog_id)?;
        Ok(merge_enrichment(self.store.as_ref(), catalog_id, &raw))
    }

    pub fn catalog_count(&self) -> usize {
        self.catalogs.len()
    }

    /// Open a session for a known catalog; returns the session id
    pub fn create_session(&self, catalog_id: &str) -> Result<String, ServerError> {
        self.catalog(catalog_id)?;
        let session = self.engine.start_session(catalog_id);
        let id = session.id().to_string();
        self.sessions.insert(id.clone(), Arc::new(Mutex::new(session)));
        tracing::info!(session_id = %id, catalog_id, "Session created");
        Ok(id)
    }

    pub fn session(&self, id: &str) -> Result<Arc<Mutex<OrderSession>>, ServerError> {
        self.sessions
            .get(id)
            .map(|s| Arc::clone(s.value()))
            .ok_or_else(|| ServerError::SessionNotFound(id.to_string()))
    }

    /// End and forget a session
    pub fn end_session(&self, id: &str) -> Result<(), ServerError> {
        let (_, session) = self
            .sessions
            .remove(id)
            .ok_or_else(|| ServerError::SessionNotFound(id.to_string()))?;
        session.lock().end();
        Ok(())
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_requires_catalog() {
        let state = AppState::new(Settings::default()).unwrap();
        assert!(matches!(
            state.create_session("missing"),
            Err(ServerError::CatalogNotFound(_))
        ));

        state.put_catalog("s1", vec![RawMenuItem::new("1", "Garlic Naan", 399)]);
        let id = state.create_session("s1").unwrap();
        assert_eq!(state.session_count(), 1);

        state.end_session(&id).unwrap();
        assert_eq!(state.session_count(), 0);
        assert!(state.end_session(&id).is_err());
    }

    #[test]
    fn test_merged_menu_without_enrichment() {
        let state = AppState::new(Settings::default()).unwrap();
        state.put_catalog("s1", vec![RawMenuItem::new("1", "Garlic Naan", 399)]);

        let menu = state.merged_menu("s1").unwrap();
        assert_eq!(menu.len(), 1);
        assert!(!menu[0].is_enriched());
        assert!(state.merged_menu("s2").is_err());
    }
}
