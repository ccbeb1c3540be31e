//! JSON snapshot file
//!
//! Writes go to a temporary file in the target directory which is then
//! renamed over the snapshot, so a crash mid-write leaves the previous
//! snapshot intact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use menu_voice_core::ItemEnrichment;

use crate::PersistenceError;

pub const SNAPSHOT_VERSION: u32 = 1;

/// On-disk form of the enrichment store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub written_at: DateTime<Utc>,
    /// Catalog id -> enrichment records
    #[serde(default)]
    pub catalogs: BTreeMap<String, Vec<ItemEnrichment>>,
}

impl Snapshot {
    pub fn new(catalogs: BTreeMap<String, Vec<ItemEnrichment>>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            written_at: Utc::now(),
            catalogs,
        }
    }

    pub fn record_count(&self) -> usize {
        self.catalogs.values().map(Vec::len).sum()
    }

    /// Read a snapshot; `None` when the file does not exist
    pub fn load(path: &Path) -> Result<Option<Self>, PersistenceError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let snapshot: Snapshot = serde_json::from_str(&content)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(PersistenceError::Snapshot(format!(
                "Unsupported snapshot version {} in {}",
                snapshot.version,
                path.display()
            )));
        }

        Ok(Some(snapshot))
    }

    /// Atomically replace the snapshot at `path`
    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer(&mut tmp, self)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| PersistenceError::Io(e.error))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> ItemEnrichment {
        ItemEnrichment {
            item_id: id.to_string(),
            original_name: name.to_string(),
            dietary_tags: ["dairy".to_string()].into_iter().collect(),
            ingredients: vec!["paneer".to_string()],
            phonetic_name: Some(name.to_lowercase()),
            stt_keywords: vec![],
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Snapshot::load(&dir.path().join("absent.json"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("enrichment.json");

        let mut catalogs = BTreeMap::new();
        catalogs.insert("store-1".to_string(), vec![record("a", "Palak Paneer")]);
        let snapshot = Snapshot::new(catalogs);
        snapshot.save(&path).unwrap();

        let loaded = Snapshot::load(&path).unwrap().unwrap();
        assert_eq!(loaded, snapshot);
        assert_eq!(loaded.record_count(), 1);

        // Overwrite leaves exactly one file behind
        Snapshot::new(BTreeMap::new()).save(&path).unwrap();
        let entries = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
        assert_eq!(Snapshot::load(&path).unwrap().unwrap().record_count(), 0);
    }

    #[test]
    fn test_corrupt_or_unknown_version_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enrichment.json");

        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            Snapshot::load(&path),
            Err(PersistenceError::Serialization(_))
        ));

        std::fs::write(
            &path,
            r#"{"version": 99, "written_at": "2024-01-01T00:00:00Z", "catalogs": {}}"#,
        )
        .unwrap();
        assert!(matches!(
            Snapshot::load(&path),
            Err(PersistenceError::Snapshot(_))
        ));
    }
}
