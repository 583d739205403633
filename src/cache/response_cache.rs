//! Get-or-compute cache over a session store
//!
//! Lookup order is memory, then the session store (promoting the decoded
//! value into memory), then `compute`. Only successful computations are
//! written, to both layers.
//!
//! There is no in-flight deduplication: two callers missing on the same key
//! both compute, and the last write wins. Both writes carry the same data.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::session_store::SessionStore;
use crate::errors::AppResult;

pub struct ResponseCache<V> {
    memory: RwLock<HashMap<String, V>>,
    store: Arc<dyn SessionStore>,
}

impl<V> ResponseCache<V>
where
    V: Clone + Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            memory: RwLock::new(HashMap::new()),
            store,
        }
    }

    pub async fn get_or_compute<F, Fut>(&self, key: &str, compute: F) -> AppResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<V>>,
    {
        if let Some(value) = self.memory.read().await.get(key) {
            debug!("Cache hit (memory): {}", key);
            return Ok(value.clone());
        }

        if let Some(value) = self.load_stored(key).await {
            debug!("Cache hit (session): {}", key);
            self.memory
                .write()
                .await
                .insert(key.to_string(), value.clone());
            return Ok(value);
        }

        debug!("Cache miss: {}", key);
        let value = compute().await?;
        self.write_through(key, &value).await;
        Ok(value)
    }

    /// Entries held in the memory layer
    pub async fn len(&self) -> usize {
        self.memory.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.memory.read().await.is_empty()
    }

    /// Drop both layers
    pub async fn clear(&self) -> AppResult<()> {
        self.memory.write().await.clear();
        self.store.clear().await
    }

    /// Stored value, treating unreadable or undecodable documents as misses
    async fn load_stored(&self, key: &str) -> Option<V> {
        let raw = match self.store.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Session store read failed for {}: {}", key, e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring undecodable cache entry {}: {}", key, e);
                None
            }
        }
    }

    async fn write_through(&self, key: &str, value: &V) {
        self.memory
            .write()
            .await
            .insert(key.to_string(), value.clone());

        match serde_json::to_string(value) {
            Ok(json) => {
                if let Err(e) = self.store.set(key, &json).await {
                    warn!("Session store write failed for {}: {}", key, e);
                }
            }
            Err(e) => warn!("Failed to serialize cache entry {}: {}", key, e),
        }
    }
}
