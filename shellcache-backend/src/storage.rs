use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use shellcache_core::{CacheKey, CacheName, CacheRequest, Response};

use crate::{BackendError, CacheEntry, DeleteStatus};

pub type BackendResult<T> = Result<T, BackendError>;

/// One named cache generation.
///
/// Implementations must make every single-key operation atomic and
/// [`write_all`](Cache::write_all) atomic as a batch: readers see either
/// none or all of the batch.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Name of the generation this handle belongs to.
    fn name(&self) -> &CacheName;

    /// Reads the entry stored under `key`, or `None` on a miss.
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<Arc<CacheEntry>>>;

    /// Stores an entry, replacing any entry under the same key.
    async fn write(&self, entry: CacheEntry) -> BackendResult<()>;

    /// Stores all entries in one atomic batch.
    async fn write_all(&self, entries: Vec<CacheEntry>) -> BackendResult<()>;

    /// Removes the entry stored under `key`.
    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus>;

    /// Keys in insertion order.
    async fn keys(&self) -> BackendResult<Vec<CacheKey>>;
}

/// The set of named caches of one origin.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Handle type returned by [`open`](CacheStorage::open).
    type Cache: Cache + Clone + 'static;

    /// Opens the named cache, creating it if absent.
    async fn open(&self, name: &CacheName) -> BackendResult<Self::Cache>;

    /// Checks whether the named cache exists, without creating it.
    async fn has(&self, name: &CacheName) -> BackendResult<bool>;

    /// Deletes the named cache with all its entries.
    async fn delete(&self, name: &CacheName) -> BackendResult<DeleteStatus>;

    /// Names of all caches in creation order.
    async fn keys(&self) -> BackendResult<Vec<CacheName>>;

    /// Returns the name of this storage for logs and metrics.
    fn label(&self) -> &str {
        "storage"
    }
}

#[async_trait]
impl<T> CacheStorage for Arc<T>
where
    T: CacheStorage,
{
    type Cache = T::Cache;

    async fn open(&self, name: &CacheName) -> BackendResult<Self::Cache> {
        (**self).open(name).await
    }

    async fn has(&self, name: &CacheName) -> BackendResult<bool> {
        (**self).has(name).await
    }

    async fn delete(&self, name: &CacheName) -> BackendResult<DeleteStatus> {
        (**self).delete(name).await
    }

    async fn keys(&self) -> BackendResult<Vec<CacheName>> {
        (**self).keys().await
    }

    fn label(&self) -> &str {
        (**self).label()
    }
}

/// Request-level operations on top of [`Cache`].
///
/// These mirror the `match` / `put` / `addAll` calls of a browser cache: they
/// derive the key from the request and hand out duplicated responses so the
/// stored snapshot is never consumed.
pub trait CacheExt: Cache {
    /// Looks up the entry stored for exactly this request.
    fn match_request(
        &self,
        request: &CacheRequest,
    ) -> impl Future<Output = BackendResult<Option<Response>>> + Send {
        async move {
            let key = CacheKey::from_request(request);
            let entry = self.read(&key).await?;
            Ok(entry.map(|entry| entry.to_response()))
        }
    }

    /// Stores `response` under the request's key.
    ///
    /// The caller keeps no reference to `response`; duplicate it first if it
    /// must also be returned.
    fn put(
        &self,
        request: &CacheRequest,
        response: Response,
    ) -> impl Future<Output = BackendResult<()>> + Send {
        async move {
            let key = CacheKey::from_request(request);
            self.write(CacheEntry::new(key, response)).await
        }
    }

    /// Stores every request/response pair in one atomic batch.
    fn put_all(
        &self,
        pairs: Vec<(CacheRequest, Response)>,
    ) -> impl Future<Output = BackendResult<()>> + Send {
        async move {
            let entries = pairs
                .into_iter()
                .map(|(request, response)| {
                    CacheEntry::new(CacheKey::from_request(&request), response)
                })
                .collect();
            self.write_all(entries).await
        }
    }
}

impl<T> CacheExt for T where T: Cache + ?Sized {}
