//! Session-scoped key/value storage
//!
//! Values are JSON documents stored as strings. [`MemorySessionStore`] lives
//! as long as the process; [`FileSessionStore`] keeps one file per key in a
//! directory, named by the sha256 of the key so arbitrary query text maps to
//! a safe file name.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::StorageConfig;
use crate::errors::{AppError, AppResult};

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;
    async fn remove(&self, key: &str) -> AppResult<()>;
    async fn clear(&self) -> AppResult<()>;
}

/// Open the store described by the storage configuration
pub async fn open_session_store(config: &StorageConfig) -> AppResult<Arc<dyn SessionStore>> {
    match &config.session_dir {
        Some(dir) => Ok(Arc::new(FileSessionStore::open(dir).await?)),
        None => Ok(Arc::new(MemorySessionStore::new())),
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}

pub struct FileSessionStore {
    dir: PathBuf,
    writes: AtomicU64,
}

impl FileSessionStore {
    /// Open a store rooted at `dir`, creating the directory when needed
    pub async fn open<P: AsRef<Path>>(dir: P) -> AppResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::storage(format!("Failed to create session directory {}: {e}", dir.display()))
        })?;
        info!("Session store opened at {}", dir.display());
        Ok(Self {
            dir,
            writes: AtomicU64::new(0),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.dir.join(format!("{}.json", hex::encode(digest)))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::storage(format!("Failed to read '{key}': {e}"))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let path = self.path_for(key);
        // Write then rename so a reader never sees a half-written document.
        // Each write gets its own temp file; concurrent writers of one key
        // race only on the rename.
        let write_id = self.writes.fetch_add(1, Ordering::Relaxed);
        let tmp = path.with_extension(format!("json.{}.{write_id}.tmp", std::process::id()));
        tokio::fs::write(&tmp, value)
            .await
            .map_err(|e| AppError::storage(format!("Failed to write '{key}': {e}")))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| AppError::storage(format!("Failed to write '{key}': {e}")))?;
        debug!("Stored '{}' ({} bytes)", key, value.len());
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::storage(format!("Failed to remove '{key}': {e}"))),
        }
    }

    async fn clear(&self) -> AppResult<()> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| AppError::storage(format!("Failed to list {}: {e}", self.dir.display())))?;
        let mut removed = 0usize;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AppError::storage(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                tokio::fs::remove_file(&path)
                    .await
                    .map_err(|e| AppError::storage(format!("Failed to remove {}: {e}", path.display())))?;
                removed += 1;
            }
        }
        info!("Cleared {} session entries from {}", removed, self.dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get("a").await.unwrap(), None);

        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.len().await, 2);

        store.remove("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);

        store.clear().await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let key = "search:spider-man / peter?|0|20";

        let store = FileSessionStore::open(temp_dir.path()).await.unwrap();
        store.set(key, r#"{"total":0}"#).await.unwrap();

        let reopened = FileSessionStore::open(temp_dir.path()).await.unwrap();
        assert_eq!(reopened.get(key).await.unwrap().as_deref(), Some(r#"{"total":0}"#));
        assert_eq!(reopened.get("search:other|0|20").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_remove_and_clear() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::open(temp_dir.path().join("session")).await.unwrap();

        store.set("one", "1").await.unwrap();
        store.set("two", "2").await.unwrap();
        store.remove("one").await.unwrap();
        store.remove("missing").await.unwrap();
        assert_eq!(store.get("one").await.unwrap(), None);

        store.clear().await.unwrap();
        assert_eq!(store.get("two").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_concurrent_writes_same_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::open(temp_dir.path()).await.unwrap();
        let key = "search:s|0|40";

        let values: Vec<String> = (0..8).map(|i| format!("{{\"count\":{i}}}")).collect();
        let results = futures::future::join_all(values.iter().map(|v| store.set(key, v))).await;
        assert!(results.iter().all(|r| r.is_ok()));

        let stored = store.get(key).await.unwrap().unwrap();
        assert!(values.contains(&stored));
        let files: Vec<_> = std::fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn test_open_from_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig {
            session_dir: Some(temp_dir.path().to_path_buf()),
        };
        let store = open_session_store(&config).await.unwrap();
        store.set("k", "v").await.unwrap();
        assert!(std::fs::read_dir(temp_dir.path()).unwrap().count() >= 1);

        let in_memory = open_session_store(&StorageConfig::default()).await.unwrap();
        assert_eq!(in_memory.get("k").await.unwrap(), None);
    }
}
