//! Persistence for stored fragments, one opaque string per content item.

use crate::error::{Error, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Identity of a content item (post, page, ...).
pub type ItemId = u64;

/// Meta key the fragment is stored under.
pub const DEFAULT_META_KEY: &str = "_custom_js_head";

/// Read/write access to the stored fragment of an item.
///
/// Saves overwrite the whole value; there is no partial update.
pub trait FragmentStore: Send + Sync {
    fn load(&self, item_id: ItemId) -> Result<Option<String>>;

    fn save(&self, item_id: ItemId, value: &str) -> Result<()>;
}

impl<T: FragmentStore + ?Sized> FragmentStore for Arc<T> {
    fn load(&self, item_id: ItemId) -> Result<Option<String>> {
        (**self).load(item_id)
    }

    fn save(&self, item_id: ItemId, value: &str) -> Result<()> {
        (**self).save(item_id, value)
    }
}

/// In-process store, for tests and the ephemeral preview host.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<ItemId, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(operation: &'static str, item_id: ItemId) -> Error {
    Error::Store {
        operation,
        item_id,
        message: "store lock poisoned".to_string(),
    }
}

impl FragmentStore for MemoryStore {
    fn load(&self, item_id: ItemId) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| poisoned("load", item_id))?;
        Ok(entries.get(&item_id).cloned())
    }

    fn save(&self, item_id: ItemId, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| poisoned("save", item_id))?;
        entries.insert(item_id, value.to_string());
        Ok(())
    }
}

/// Item metadata as kept on disk: item id -> meta key -> value.
type MetaTable = BTreeMap<String, BTreeMap<String, String>>;

/// Store backed by a single JSON file of per-item metadata.
///
/// The file looks like `{"42": {"_custom_js_head": "<script>..."}}`, so other
/// meta keys written by someone else survive a save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    meta_key: String,
    lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    /// Create a store for `path`. The file is created on first save.
    pub fn new(path: impl Into<PathBuf>, meta_key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            meta_key: meta_key.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<MetaTable> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(MetaTable::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(MetaTable::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_table(&self, table: &MetaTable) -> Result<()> {
        let content = serde_json::to_string_pretty(table)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl FragmentStore for JsonFileStore {
    fn load(&self, item_id: ItemId) -> Result<Option<String>> {
        let _guard = self.lock.lock().map_err(|_| poisoned("load", item_id))?;
        let table = self.read_table()?;
        Ok(table
            .get(&item_id.to_string())
            .and_then(|meta| meta.get(&self.meta_key))
            .cloned())
    }

    fn save(&self, item_id: ItemId, value: &str) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| poisoned("save", item_id))?;
        let mut table = self.read_table()?;
        table
            .entry(item_id.to_string())
            .or_default()
            .insert(self.meta_key.clone(), value.to_string());
        self.write_table(&table)?;
        debug!(
            "Saved {} bytes for item {} to {}",
            value.len(),
            item_id,
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ==================== MemoryStore Tests ====================

    #[test]
    fn test_memory_store_missing_item() {
        let store = MemoryStore::new();
        assert_eq!(store.load(1).unwrap(), None);
    }

    #[test]
    fn test_memory_store_overwrites() {
        let store = MemoryStore::new();
        store.save(1, "first").unwrap();
        store.save(1, "second").unwrap();
        assert_eq!(store.load(1).unwrap().as_deref(), Some("second"));
        assert_eq!(store.load(2).unwrap(), None);
    }

    #[test]
    fn test_memory_store_clones_share_state() {
        let store = MemoryStore::new();
        let clone = store.clone();
        store.save(7, "shared").unwrap();
        assert_eq!(clone.load(7).unwrap().as_deref(), Some("shared"));
    }

    // ==================== JsonFileStore Tests ====================

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::new(temp_dir.path().join("meta.json"), DEFAULT_META_KEY);
        assert_eq!(store.load(1).unwrap(), None);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("meta.json");

        JsonFileStore::new(&path, DEFAULT_META_KEY)
            .save(42, "<script>a()</script>")
            .unwrap();

        let reopened = JsonFileStore::new(&path, DEFAULT_META_KEY);
        assert_eq!(
            reopened.load(42).unwrap().as_deref(),
            Some("<script>a()</script>")
        );
    }

    #[test]
    fn test_file_store_keeps_other_meta_keys() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("meta.json");
        fs::write(&path, r#"{"42": {"_thumbnail_id": "9"}}"#).unwrap();

        let store = JsonFileStore::new(&path, DEFAULT_META_KEY);
        store.save(42, "x").unwrap();

        let raw: MetaTable = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["42"]["_thumbnail_id"], "9");
        assert_eq!(raw["42"][DEFAULT_META_KEY], "x");
    }

    #[test]
    fn test_file_store_separates_meta_keys() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("meta.json");

        JsonFileStore::new(&path, "_a").save(1, "a").unwrap();
        let other = JsonFileStore::new(&path, "_b");
        assert_eq!(other.load(1).unwrap(), None);
    }

    #[test]
    fn test_file_store_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("meta.json");
        fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::new(&path, DEFAULT_META_KEY);
        assert!(matches!(store.load(1), Err(Error::Json(_))));
    }
}
