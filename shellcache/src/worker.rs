//! A single worker version.
//!
//! [`OfflineWorker`] owns one cache generation. It installs by preloading the
//! manifest into that generation, activates by deleting every other
//! generation, and from then on answers intercepted fetches with the
//! strategy its policy picks for the request class.
//!
//! The network is passed to every call instead of being stored in the
//! worker, so the same worker can answer requests coming through different
//! transports (a tower service, a client, a test double).

use std::fmt;

use futures::future::join_all;
use shellcache_backend::{CacheExt, CacheStorage, DeleteStatus};
use shellcache_core::{CacheName, CacheRequest, FetchResult, RequestClass, Upstream};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::classify::classify;
use crate::config::WorkerConfig;
use crate::error::{InstallError, WorkerError};
use crate::fsm::{InvalidTransition, LifecycleEvent, WorkerState};
use crate::metrics;
use crate::policy::NavigationStrategy;
use crate::strategy::{self, FetchOutcome};

/// Outcome of an activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivateReport {
    /// Generation kept.
    pub current: CacheName,
    /// Stale generations deleted.
    pub deleted: Vec<CacheName>,
    /// Stale generations whose deletion failed. They are left in place.
    pub failed: Vec<CacheName>,
}

impl ActivateReport {
    fn new(current: CacheName) -> Self {
        Self {
            current,
            deleted: Vec::new(),
            failed: Vec::new(),
        }
    }
}

/// One version of the offline worker.
///
/// # Example
///
/// ```
/// use shellcache::{OfflineWorker, WorkerConfig, WorkerState};
/// use shellcache_backend::MemoryStorage;
/// use shellcache_core::{CacheRequest, NetworkError, Response, upstream_fn};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let config = WorkerConfig::builder("https://example.com".parse().unwrap(), "v1".into())
///     .manifest(["/", "/index.html"])
///     .build();
/// let worker = OfflineWorker::new(config, MemoryStorage::new());
/// let mut network = upstream_fn(|_req: CacheRequest| async {
///     Ok::<_, NetworkError>(Response::ok("<html>"))
/// });
///
/// worker.install(&mut network).await.unwrap();
/// worker.activate().await.unwrap();
/// assert_eq!(worker.state(), WorkerState::Active);
/// # }
/// ```
pub struct OfflineWorker<S> {
    config: WorkerConfig,
    storage: S,
    shell: Option<CacheRequest>,
    state: watch::Sender<WorkerState>,
}

impl<S> OfflineWorker<S>
where
    S: CacheStorage,
{
    /// Creates an uninstalled worker for `config` on `storage`.
    pub fn new(config: WorkerConfig, storage: S) -> Self {
        let shell = config
            .policy()
            .offline_fallback
            .as_deref()
            .and_then(|path| match config.origin().resolve(path) {
                Ok(uri) => Some(CacheRequest::get(uri)),
                Err(error) => {
                    warn!(shell = path, %error, "ignoring invalid offline fallback");
                    None
                }
            });
        let (state, _) = watch::channel(WorkerState::Uninstalled);
        Self {
            config,
            storage,
            shell,
            state,
        }
    }

    /// Configuration of this version.
    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Storage shared with the other versions.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Generation owned by this version.
    pub fn cache_name(&self) -> &CacheName {
        self.config.cache_name()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WorkerState {
        *self.state.borrow()
    }

    /// Subscribes to lifecycle state changes.
    pub fn subscribe(&self) -> watch::Receiver<WorkerState> {
        self.state.subscribe()
    }

    fn advance(&self, event: LifecycleEvent) -> Result<WorkerState, InvalidTransition> {
        let mut outcome = Err(InvalidTransition {
            from: WorkerState::Uninstalled,
            event,
        });
        self.state.send_if_modified(|state| match state.on(event) {
            Ok(next) => {
                debug!(cache = %self.config.cache_name(), from = %state, to = %next, "worker state changed");
                *state = next;
                outcome = Ok(next);
                true
            }
            Err(error) => {
                outcome = Err(error);
                false
            }
        });
        outcome
    }

    /// Preloads the manifest into this version's generation.
    ///
    /// Every manifest URL is fetched concurrently. Only when all of them
    /// answer with a 2xx status are they written, in one atomic batch; the
    /// worker then waits for activation. Otherwise nothing is written and the
    /// worker becomes redundant. Running install for a generation that is
    /// already populated overwrites its entries by key.
    ///
    /// Returns the number of entries stored.
    #[tracing::instrument(
        name = "install",
        skip_all,
        fields(cache = %self.config.cache_name(), storage = self.storage.label())
    )]
    pub async fn install<U>(&self, upstream: &mut U) -> Result<usize, WorkerError>
    where
        U: Upstream<CacheRequest, Response = FetchResult>,
    {
        self.advance(LifecycleEvent::Install)?;
        info!(entries = self.config.manifest().len(), "install started");

        match self.precache(upstream).await {
            Ok(stored) => {
                self.advance(LifecycleEvent::Installed)?;
                metrics::record_install("installed");
                info!(stored, "install completed");
                Ok(stored)
            }
            Err(error) => {
                self.advance(LifecycleEvent::InstallFailed)?;
                metrics::record_install("failed");
                warn!(%error, "install failed");
                Err(error.into())
            }
        }
    }

    async fn precache<U>(&self, upstream: &mut U) -> Result<usize, InstallError>
    where
        U: Upstream<CacheRequest, Response = FetchResult>,
    {
        let origin = self.config.origin();
        let requests = self
            .config
            .manifest()
            .iter()
            .map(|url| {
                origin
                    .resolve(url)
                    .map(CacheRequest::get)
                    .map_err(|source| InstallError::InvalidUrl {
                        url: url.to_owned(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let fetches: Vec<_> = requests
            .iter()
            .map(|request| upstream.call(request.clone()))
            .collect();
        let responses = join_all(fetches).await;

        let mut pairs = Vec::with_capacity(requests.len());
        for (request, response) in requests.into_iter().zip(responses) {
            let response = response.map_err(InstallError::Fetch)?;
            if !response.is_success() {
                return Err(InstallError::BadStatus {
                    url: request.uri().to_string(),
                    status: response.status().as_u16(),
                });
            }
            debug!(url = %request.uri(), "manifest entry fetched");
            pairs.push((request, response));
        }

        let stored = pairs.len();
        let cache = self.storage.open(self.config.cache_name()).await?;
        cache.put_all(pairs).await?;
        Ok(stored)
    }

    /// Deletes every generation except this version's and starts
    /// intercepting fetches.
    ///
    /// A generation that fails to delete is logged and reported in
    /// [`ActivateReport::failed`]; it does not block activation.
    #[tracing::instrument(name = "activate", skip_all, fields(cache = %self.config.cache_name()))]
    pub async fn activate(&self) -> Result<ActivateReport, WorkerError> {
        self.advance(LifecycleEvent::Activate)?;
        let report = self.reclaim().await;
        self.advance(LifecycleEvent::Activated)?;

        metrics::record_generations_deleted(report.deleted.len());
        info!(
            deleted = report.deleted.len(),
            failed = report.failed.len(),
            "activated"
        );
        Ok(report)
    }

    async fn reclaim(&self) -> ActivateReport {
        let current = self.config.cache_name();
        let mut report = ActivateReport::new(current.clone());

        let names = match self.storage.keys().await {
            Ok(names) => names,
            Err(error) => {
                warn!(%error, "failed to list cache generations");
                return report;
            }
        };
        let stale: Vec<CacheName> = names.into_iter().filter(|name| name != current).collect();
        let results = join_all(stale.iter().map(|name| self.storage.delete(name))).await;

        for (name, result) in stale.into_iter().zip(results) {
            match result {
                Ok(DeleteStatus::Deleted(_)) => {
                    info!(generation = %name, "deleted stale cache generation");
                    report.deleted.push(name);
                }
                Ok(DeleteStatus::Missing) => {
                    debug!(generation = %name, "stale cache generation already gone");
                }
                Err(error) => {
                    warn!(generation = %name, %error, "failed to delete stale cache generation");
                    report.failed.push(name);
                }
            }
        }
        report
    }

    /// Marks this version redundant after a newer one took its place.
    pub fn supersede(&self) -> Result<(), InvalidTransition> {
        self.advance(LifecycleEvent::Superseded)?;
        info!(cache = %self.config.cache_name(), "worker superseded");
        Ok(())
    }

    /// Class the request is handled as. Everything passes through unless the
    /// worker is active.
    pub fn route(&self, request: &CacheRequest) -> RequestClass {
        if !self.state().is_active() {
            return RequestClass::Passthrough;
        }
        classify(&self.config, request)
    }

    /// Answers an intercepted fetch.
    #[tracing::instrument(
        name = "fetch",
        skip_all,
        fields(method = %request.method(), url = %request.uri())
    )]
    pub async fn handle_fetch<U>(&self, request: CacheRequest, upstream: &mut U) -> FetchOutcome
    where
        U: Upstream<CacheRequest, Response = FetchResult>,
    {
        let class = self.route(&request);
        self.respond(class, request, upstream).await
    }

    /// Answers `request` with the strategy for `class`.
    ///
    /// [`route`](Self::route) decides the class; callers that forward
    /// pass-through requests themselves call the two separately.
    pub async fn respond<U>(
        &self,
        class: RequestClass,
        request: CacheRequest,
        upstream: &mut U,
    ) -> FetchOutcome
    where
        U: Upstream<CacheRequest, Response = FetchResult>,
    {
        debug!(%class, "handling fetch");
        let origin = self.config.origin();
        let outcome = match class {
            RequestClass::Passthrough => strategy::pass_through(request, upstream).await,
            RequestClass::Navigation => {
                let cache = self.open_cache().await;
                let shell = self.shell.as_ref();
                match self.config.policy().navigation {
                    NavigationStrategy::NetworkFirst => {
                        strategy::network_first(cache.as_ref(), origin, class, request, upstream, shell)
                            .await
                    }
                    NavigationStrategy::CacheFirst => {
                        strategy::cache_first(cache.as_ref(), origin, class, request, upstream, shell)
                            .await
                    }
                }
            }
            RequestClass::StaticAsset => {
                let cache = self.open_cache().await;
                strategy::cache_first(cache.as_ref(), origin, class, request, upstream, None).await
            }
        };

        let (result, ctx) = &outcome;
        debug!(source = %ctx.source, stored = ctx.stored, ok = result.is_ok(), "fetch handled");
        metrics::record_fetch(ctx, result.is_err());
        outcome
    }

    async fn open_cache(&self) -> Option<S::Cache> {
        match self.storage.open(self.config.cache_name()).await {
            Ok(cache) => Some(cache),
            Err(error) => {
                warn!(cache = %self.config.cache_name(), %error, "failed to open cache");
                None
            }
        }
    }
}

impl<S> fmt::Debug for OfflineWorker<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OfflineWorker")
            .field("cache_name", self.config.cache_name())
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}
