use std::fmt;
use std::sync::Arc;

use anyhow::{Error, anyhow};
use cucumber::World;
use cucumber::gherkin::Step;
use http::uri::{Authority, Scheme};
use shellcache::{
    ActivateReport, FetchContext, PolicyConfig, Registration, WorkerConfig, WorkerError,
};
use shellcache_backend::{CacheExt, CacheStorage};
use shellcache_core::{CacheName, CacheRequest, Origin, Response};

use crate::mock_storage::MockStorage;
use crate::mock_upstream::MockUpstream;

pub const DEFAULT_AUTHORITY: &str = "localhost:3000";

/// Result of the last fetch issued by a scenario.
#[derive(Debug, Default)]
pub struct FetchState {
    pub response: Option<Response>,
    pub error: Option<String>,
    pub context: Option<FetchContext>,
}

#[derive(World)]
#[world(init = Self::new)]
pub struct OfflineWorld {
    pub origin: Origin,
    pub network: MockUpstream,
    pub storage: MockStorage,
    pub registration: Arc<Registration<MockStorage>>,
    pub manifest: Vec<String>,
    pub extensions: Option<Vec<String>>,
    pub policy: PolicyConfig,
    pub skip_waiting: bool,
    pub install: Option<Result<(), String>>,
    pub activation: Option<ActivateReport>,
    pub fetch: FetchState,
}

impl OfflineWorld {
    pub fn new() -> Self {
        crate::tracing::init();
        let origin = Origin::new(Scheme::HTTP, Authority::from_static(DEFAULT_AUTHORITY));
        let storage = MockStorage::new();
        Self {
            network: MockUpstream::new(origin.clone()),
            registration: Arc::new(Registration::new(storage.clone())),
            storage,
            origin,
            manifest: Vec::new(),
            extensions: None,
            policy: PolicyConfig::advanced(),
            skip_waiting: false,
            install: None,
            activation: None,
            fetch: FetchState::default(),
        }
    }

    pub fn config(&self, cache_name: &str) -> WorkerConfig {
        let mut builder = WorkerConfig::builder(self.origin.clone(), cache_name.into())
            .manifest(self.manifest.iter().map(String::as_str))
            .skip_waiting(self.skip_waiting)
            .policy(self.policy.clone());
        if let Some(extensions) = &self.extensions {
            builder = builder.extensions(extensions);
        }
        builder.build()
    }

    /// Registers a version named `cache_name` and keeps the install outcome.
    pub async fn register(&mut self, cache_name: &str) -> Result<(), WorkerError> {
        let config = self.config(cache_name);
        let mut network = self.network.clone();
        match self.registration.register(config, &mut network).await {
            Ok(_) => {
                self.install = Some(Ok(()));
                Ok(())
            }
            Err(error) => {
                self.install = Some(Err(error.to_string()));
                Err(error)
            }
        }
    }

    pub fn request(&self, path: &str) -> Result<CacheRequest, Error> {
        Ok(CacheRequest::get(self.origin.resolve(path)?))
    }

    pub async fn fetch(&mut self, request: CacheRequest) {
        let mut network = self.network.clone();
        let (result, context) = self.registration.fetch(request, &mut network).await;
        self.fetch = match result {
            Ok(response) => FetchState {
                response: Some(response),
                error: None,
                context: Some(context),
            },
            Err(error) => FetchState {
                response: None,
                error: Some(error.to_string()),
                context: Some(context),
            },
        };
    }

    pub async fn cached(&self, cache_name: &str, path: &str) -> Result<Option<Response>, Error> {
        let name = CacheName::new(cache_name);
        if !self.storage.inner.has(&name).await? {
            return Ok(None);
        }
        let cache = self.storage.inner.open(&name).await?;
        Ok(cache.match_request(&self.request(path)?).await?)
    }

    pub fn response(&self) -> Result<&Response, Error> {
        self.fetch.response.as_ref().ok_or_else(|| {
            anyhow!(
                "no response available, fetch error: {:?}",
                self.fetch.error
            )
        })
    }

    pub fn context(&self) -> Result<&FetchContext, Error> {
        self.fetch
            .context
            .as_ref()
            .ok_or_else(|| anyhow!("no fetch was issued"))
    }
}

impl Default for OfflineWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OfflineWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OfflineWorld")
            .field("origin", &self.origin)
            .field("manifest", &self.manifest)
            .field("policy", &self.policy)
            .field("install", &self.install)
            .field("fetch", &self.fetch)
            .finish_non_exhaustive()
    }
}

pub trait StepExt {
    /// Non-empty lines of the step's docstring, trimmed.
    fn docstring_lines(&self) -> Vec<String>;
}

impl StepExt for Step {
    fn docstring_lines(&self) -> Vec<String> {
        self.docstring()
            .map(|docstring| {
                docstring
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}
