//! Key-value store implementations.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use pptee_core::error::{PpteeError, Result};
use pptee_core::kv::KeyValueStore;

use super::atomic_file::AtomicFile;

type Entries = BTreeMap<String, String>;

/// Key-value store persisted as a single JSON object.
///
/// The file is read once when the store is opened. Every mutation writes the
/// whole updated map through to disk while holding the map lock, so writes
/// land in mutation order, and memory only changes once the write succeeded.
#[derive(Clone)]
pub struct FileKeyValueStore {
    entries: Arc<Mutex<Entries>>,
    file: Arc<AtomicFile<Entries>>,
}

impl FileKeyValueStore {
    /// Opens the store at `path`, starting empty if the file does not exist.
    pub async fn open(path: PathBuf) -> Result<Self> {
        let file = AtomicFile::<Entries>::json(path);
        let (file, entries) = tokio::task::spawn_blocking(move || {
            let entries = file.load()?.unwrap_or_default();
            Ok::<_, PpteeError>((file, entries))
        })
        .await
        .map_err(|e| PpteeError::internal(format!("Failed to join task: {}", e)))??;

        tracing::debug!(
            "[Storage] Opened {} ({} keys)",
            file.path().display(),
            entries.len()
        );

        Ok(Self {
            entries: Arc::new(Mutex::new(entries)),
            file: Arc::new(file),
        })
    }

    /// Applies `f` to a copy of the map and swaps the copy in only once it is
    /// on disk. A failed write leaves memory and file unchanged.
    async fn mutate<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Entries) -> bool,
    {
        let mut entries = self.entries.lock().await;
        let mut updated = entries.clone();
        if !f(&mut updated) {
            return Ok(());
        }

        let file = self.file.clone();
        let saved = tokio::task::spawn_blocking(move || file.save(&updated).map(|()| updated))
            .await
            .map_err(|e| PpteeError::internal(format!("Failed to join task: {}", e)))?
            .inspect_err(|e| tracing::error!("[Storage] Write-through failed: {}", e))?;
        *entries = saved;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value);
            true
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.mutate(|entries| entries.remove(key).is_some()).await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.lock().await.keys().cloned().collect())
    }
}

/// In-memory key-value store. Contents are lost when dropped.
#[derive(Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Arc<Mutex<Entries>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.lock().await.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pptee_core::kv::keys;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("local_storage.json");

        let store = FileKeyValueStore::open(path.clone()).await.unwrap();
        assert!(store.get(keys::AUTH).await.unwrap().is_none());
        store
            .set(keys::AUTH, keys::AUTH_TRUE.to_string())
            .await
            .unwrap();
        store
            .set(keys::ENVIRONMENT, keys::ENVIRONMENT_READY.to_string())
            .await
            .unwrap();
        store.remove(keys::ENVIRONMENT).await.unwrap();
        drop(store);

        let reopened = FileKeyValueStore::open(path.clone()).await.unwrap();
        assert_eq!(
            reopened.get(keys::AUTH).await.unwrap().as_deref(),
            Some("true")
        );
        assert_eq!(reopened.keys().await.unwrap(), vec![keys::AUTH.to_string()]);

        let raw = std::fs::read_to_string(path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["pp-tee-auth"], "true");
    }

    #[tokio::test]
    async fn test_removing_missing_key_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("local_storage.json");
        let store = FileKeyValueStore::open(path.clone()).await.unwrap();
        store.remove("absent").await.unwrap();
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_write_keeps_memory_in_sync_with_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("local_storage.json");
        let store = FileKeyValueStore::open(path.clone()).await.unwrap();
        store.set("kept", "1".to_string()).await.unwrap();

        // A non-empty directory in place of the file makes the rename fail.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupied"), "x").unwrap();

        let err = store
            .set(keys::AUTH, keys::AUTH_TRUE.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, PpteeError::Io { .. }));
        assert!(store.get(keys::AUTH).await.unwrap().is_none());
        assert!(store.remove("kept").await.is_err());
        assert_eq!(store.get("kept").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.keys().await.unwrap(), vec!["kept".to_string()]);
    }

    #[tokio::test]
    async fn test_memory_store_contract() {
        let store = MemoryKeyValueStore::new();
        store.set("b", "2".to_string()).await.unwrap();
        store.set("a", "1".to_string()).await.unwrap();
        store.set("a", "3".to_string()).await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("3"));
        assert_eq!(store.keys().await.unwrap(), vec!["a", "b"]);
        store.remove("a").await.unwrap();
        assert!(store.get("a").await.unwrap().is_none());
    }
}
