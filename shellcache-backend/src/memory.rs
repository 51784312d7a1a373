//! In-memory cache storage.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use indexmap::IndexMap;
use shellcache_core::{CacheKey, CacheName};
use tokio::sync::RwLock;

use crate::{BackendResult, Cache, CacheEntry, CacheStorage, DeleteStatus};

/// In-memory [`CacheStorage`].
///
/// Caches live in a [`DashMap`] keyed by name; each cache keeps its entries
/// in insertion order behind a [`RwLock`], so a batch write is atomic with
/// respect to readers.
///
/// Cloning is cheap and clones share the same caches.
///
/// # Examples
///
/// ```
/// use shellcache_backend::{CacheStorage, MemoryStorage};
/// use shellcache_core::CacheName;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let storage = MemoryStorage::new();
/// storage.open(&CacheName::new("portfolio-v1")).await.unwrap();
/// assert!(storage.has(&CacheName::new("portfolio-v1")).await.unwrap());
/// # }
/// ```
///
/// # Caveats
///
/// - Data is **not persisted**: caches are lost when the process exits
/// - A handle obtained from [`open`](CacheStorage::open) stays usable after the
///   cache is deleted, but it is detached from the storage
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    caches: Arc<DashMap<CacheName, MemoryCache>>,
    sequence: Arc<AtomicU64>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of caches.
    pub fn len(&self) -> usize {
        self.caches.len()
    }

    /// Returns `true` when no cache exists.
    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }
}

#[async_trait]
impl CacheStorage for MemoryStorage {
    type Cache = MemoryCache;

    async fn open(&self, name: &CacheName) -> BackendResult<MemoryCache> {
        let cache = self
            .caches
            .entry(name.clone())
            .or_insert_with(|| {
                tracing::trace!(cache = %name, "creating cache");
                MemoryCache::new(name.clone(), self.sequence.fetch_add(1, Ordering::Relaxed))
            })
            .clone();
        Ok(cache)
    }

    async fn has(&self, name: &CacheName) -> BackendResult<bool> {
        Ok(self.caches.contains_key(name))
    }

    async fn delete(&self, name: &CacheName) -> BackendResult<DeleteStatus> {
        match self.caches.remove(name) {
            Some(_) => Ok(DeleteStatus::Deleted(1)),
            None => Ok(DeleteStatus::Missing),
        }
    }

    async fn keys(&self) -> BackendResult<Vec<CacheName>> {
        let mut names: Vec<(u64, CacheName)> = self
            .caches
            .iter()
            .map(|cache| (cache.created, cache.key().clone()))
            .collect();
        names.sort_unstable_by_key(|(created, _)| *created);
        Ok(names.into_iter().map(|(_, name)| name).collect())
    }

    fn label(&self) -> &str {
        "memory"
    }
}

/// Handle to one in-memory cache generation.
#[derive(Clone, Debug)]
pub struct MemoryCache {
    name: CacheName,
    created: u64,
    entries: Arc<RwLock<IndexMap<CacheKey, Arc<CacheEntry>>>>,
}

impl MemoryCache {
    fn new(name: CacheName, created: u64) -> Self {
        Self {
            name,
            created,
            entries: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Number of entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` when the cache holds no entry.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Estimated memory usage of all entries in bytes.
    pub async fn memory_size(&self) -> usize {
        self.entries
            .read()
            .await
            .values()
            .map(|entry| entry.memory_size())
            .sum()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    fn name(&self) -> &CacheName {
        &self.name
    }

    async fn read(&self, key: &CacheKey) -> BackendResult<Option<Arc<CacheEntry>>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn write(&self, entry: CacheEntry) -> BackendResult<()> {
        let key = entry.key().clone();
        self.entries.write().await.insert(key, Arc::new(entry));
        Ok(())
    }

    async fn write_all(&self, entries: Vec<CacheEntry>) -> BackendResult<()> {
        let mut guard = self.entries.write().await;
        for entry in entries {
            guard.insert(entry.key().clone(), Arc::new(entry));
        }
        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        match self.entries.write().await.shift_remove(key) {
            Some(_) => Ok(DeleteStatus::Deleted(1)),
            None => Ok(DeleteStatus::Missing),
        }
    }

    async fn keys(&self) -> BackendResult<Vec<CacheKey>> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_is_idempotent() {
        let storage = MemoryStorage::new();
        let name = CacheName::new("v1");
        storage.open(&name).await.unwrap();
        storage.open(&name).await.unwrap();
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn keys_follow_creation_order() {
        let storage = MemoryStorage::new();
        for name in ["c", "a", "b"] {
            storage.open(&CacheName::new(name)).await.unwrap();
        }
        let names: Vec<String> = storage
            .keys()
            .await
            .unwrap()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[tokio::test]
    async fn delete_reports_missing() {
        let storage = MemoryStorage::new();
        let name = CacheName::new("v1");
        assert_eq!(storage.delete(&name).await.unwrap(), DeleteStatus::Missing);
        storage.open(&name).await.unwrap();
        assert_eq!(storage.delete(&name).await.unwrap(), DeleteStatus::Deleted(1));
        assert!(!storage.has(&name).await.unwrap());
    }
}
