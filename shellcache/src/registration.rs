//! Worker versions registered for one origin.
//!
//! A [`Registration`] holds at most one active and one waiting
//! [`OfflineWorker`]. Registering a new version installs it next to the active
//! one; the active version keeps answering fetches until the new one is
//! promoted, either right away (no active version, no controlled page, or
//! `skip_waiting`) or when the last controlled page closes.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use shellcache_backend::CacheStorage;
use shellcache_core::{CacheRequest, FetchResult, RequestClass, Upstream};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::strategy::{self, FetchOutcome};
use crate::worker::{ActivateReport, OfflineWorker};

struct Slots<S> {
    active: Option<Arc<OfflineWorker<S>>>,
    waiting: Option<Arc<OfflineWorker<S>>>,
}

/// Registration of the offline worker for one origin.
///
/// # Example
///
/// ```
/// use shellcache::{Registration, WorkerConfig};
/// use shellcache_backend::MemoryStorage;
/// use shellcache_core::{CacheRequest, NetworkError, Response, upstream_fn};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let registration = Registration::new(MemoryStorage::new());
/// let mut network = upstream_fn(|_req: CacheRequest| async {
///     Ok::<_, NetworkError>(Response::ok("<html>"))
/// });
///
/// let config = WorkerConfig::builder("https://example.com".parse().unwrap(), "v1".into())
///     .manifest(["/"])
///     .build();
/// registration.register(config, &mut network).await.unwrap();
///
/// let active = registration.active().await.unwrap();
/// assert_eq!(active.cache_name().as_str(), "v1");
/// # }
/// ```
pub struct Registration<S> {
    storage: S,
    slots: RwLock<Slots<S>>,
    clients: AtomicUsize,
}

impl<S> Registration<S>
where
    S: CacheStorage + Clone,
{
    /// Creates an empty registration on `storage`.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            slots: RwLock::new(Slots {
                active: None,
                waiting: None,
            }),
            clients: AtomicUsize::new(0),
        }
    }

    /// Storage shared by every version.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Version answering fetches.
    pub async fn active(&self) -> Option<Arc<OfflineWorker<S>>> {
        self.slots.read().await.active.clone()
    }

    /// Installed version waiting for promotion.
    pub async fn waiting(&self) -> Option<Arc<OfflineWorker<S>>> {
        self.slots.read().await.waiting.clone()
    }

    /// Number of controlled pages.
    pub fn clients(&self) -> usize {
        self.clients.load(Ordering::Acquire)
    }

    /// Installs a new version.
    ///
    /// On install failure the error is returned and the active and waiting
    /// versions are untouched. On success the new version is promoted when
    /// there is no active version, no page is controlled, or its config sets
    /// `skip_waiting`; otherwise it replaces any previous waiting version and
    /// waits.
    pub async fn register<U>(
        &self,
        config: WorkerConfig,
        upstream: &mut U,
    ) -> Result<Arc<OfflineWorker<S>>, WorkerError>
    where
        U: Upstream<CacheRequest, Response = FetchResult>,
    {
        let worker = Arc::new(OfflineWorker::new(config, self.storage.clone()));
        worker.install(upstream).await?;

        let mut slots = self.slots.write().await;
        if let Some(previous) = slots.waiting.take() {
            retire(&previous);
        }
        if slots.active.is_none() || self.clients() == 0 || worker.config().skip_waiting() {
            promote(&mut slots, Arc::clone(&worker)).await?;
        } else {
            info!(cache = %worker.cache_name(), "new version waiting");
            slots.waiting = Some(Arc::clone(&worker));
        }
        Ok(worker)
    }

    /// Promotes the waiting version now, regardless of controlled pages.
    ///
    /// Returns `None` when no version is waiting.
    pub async fn skip_waiting(&self) -> Result<Option<ActivateReport>, WorkerError> {
        let mut slots = self.slots.write().await;
        match slots.waiting.take() {
            Some(worker) => promote(&mut slots, worker).await.map(Some),
            None => Ok(None),
        }
    }

    /// A page came under control. Returns the number of controlled pages.
    pub fn client_claimed(&self) -> usize {
        let clients = self.clients.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(clients, "client claimed");
        clients
    }

    /// A controlled page closed.
    ///
    /// When it was the last one, the waiting version is promoted and its
    /// activation report returned.
    pub async fn client_closed(&self) -> Result<Option<ActivateReport>, WorkerError> {
        let previous = self
            .clients
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |clients| {
                Some(clients.saturating_sub(1))
            })
            .unwrap_or_default();
        debug!(clients = previous.saturating_sub(1), "client closed");
        if previous > 1 {
            return Ok(None);
        }
        self.skip_waiting().await
    }

    /// Answers a fetch with the active version, or sends it to the network
    /// when there is none.
    pub async fn fetch<U>(&self, request: CacheRequest, upstream: &mut U) -> FetchOutcome
    where
        U: Upstream<CacheRequest, Response = FetchResult>,
    {
        match self.active().await {
            Some(worker) => worker.handle_fetch(request, upstream).await,
            None => strategy::pass_through(request, upstream).await,
        }
    }

    /// Class the active version would handle `request` as, together with
    /// that version. [`RequestClass::Passthrough`] without an active version.
    pub async fn route(
        &self,
        request: &CacheRequest,
    ) -> (RequestClass, Option<Arc<OfflineWorker<S>>>) {
        match self.active().await {
            Some(worker) => (worker.route(request), Some(worker)),
            None => (RequestClass::Passthrough, None),
        }
    }
}

async fn promote<S>(
    slots: &mut Slots<S>,
    worker: Arc<OfflineWorker<S>>,
) -> Result<ActivateReport, WorkerError>
where
    S: CacheStorage,
{
    let report = worker.activate().await?;
    if let Some(previous) = slots.active.replace(worker) {
        retire(&previous);
    }
    Ok(report)
}

fn retire<S>(worker: &OfflineWorker<S>)
where
    S: CacheStorage,
{
    if let Err(error) = worker.supersede() {
        warn!(cache = %worker.cache_name(), %error, "failed to retire worker");
    }
}
