use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashSet;
use shellcache_backend::{
    BackendError, BackendResult, CacheStorage, DeleteStatus, MemoryCache, MemoryStorage,
};
use shellcache_core::CacheName;

#[derive(Debug, Default)]
pub struct StorageCounters {
    pub open_count: AtomicUsize,
    pub delete_count: AtomicUsize,
    pub failed_delete_count: AtomicUsize,
}

impl StorageCounters {
    pub fn open_count(&self) -> usize {
        self.open_count.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.delete_count.load(Ordering::SeqCst)
    }

    pub fn failed_delete_count(&self) -> usize {
        self.failed_delete_count.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.open_count.store(0, Ordering::SeqCst);
        self.delete_count.store(0, Ordering::SeqCst);
        self.failed_delete_count.store(0, Ordering::SeqCst);
    }
}

/// [`MemoryStorage`] with counters and failure injection.
#[derive(Clone, Debug, Default)]
pub struct MockStorage {
    pub inner: MemoryStorage,
    pub counters: Arc<StorageCounters>,
    undeletable: Arc<DashSet<CacheName>>,
    unavailable: Arc<AtomicBool>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `delete` of `name` fail.
    pub fn fail_delete(&self, name: impl Into<CacheName>) {
        self.undeletable.insert(name.into());
    }

    /// Makes `open` fail, as a browser does when storage is disabled.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn open_count(&self) -> usize {
        self.counters.open_count()
    }

    pub fn delete_count(&self) -> usize {
        self.counters.delete_count()
    }

    pub fn failed_delete_count(&self) -> usize {
        self.counters.failed_delete_count()
    }

    /// Names of all caches, empty when listing fails.
    pub async fn names(&self) -> Vec<CacheName> {
        self.inner.keys().await.unwrap_or_default()
    }
}

#[async_trait]
impl CacheStorage for MockStorage {
    type Cache = MemoryCache;

    async fn open(&self, name: &CacheName) -> BackendResult<MemoryCache> {
        self.counters.open_count.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(BackendError::connection("storage disabled"));
        }
        self.inner.open(name).await
    }

    async fn has(&self, name: &CacheName) -> BackendResult<bool> {
        self.inner.has(name).await
    }

    async fn delete(&self, name: &CacheName) -> BackendResult<DeleteStatus> {
        self.counters.delete_count.fetch_add(1, Ordering::SeqCst);
        if self.undeletable.contains(name) {
            self.counters
                .failed_delete_count
                .fetch_add(1, Ordering::SeqCst);
            return Err(BackendError::internal(format!("cannot delete {name}")));
        }
        self.inner.delete(name).await
    }

    async fn keys(&self) -> BackendResult<Vec<CacheName>> {
        self.inner.keys().await
    }

    fn label(&self) -> &str {
        "mock"
    }
}
