#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Request classification.
///
/// [`classify`] decides from the method, the request mode and the URL
/// whether a request is a navigation, a static asset or passes through.
pub mod classify;

/// Worker configuration types.
///
/// Provides [`WorkerConfig`] and its builder: origin, cache generation,
/// manifest, extension allow-list, `skip_waiting` and the policy.
pub mod config;

/// Error types for worker operations.
///
/// Defines [`WorkerError`] which covers:
/// - Install failures ([`InstallError`])
/// - Out-of-order lifecycle events
/// - Storage failures outside of install
///
/// and [`FetchError`] for fetches that cannot be answered.
pub mod error;

/// Finite State Machine for the worker lifecycle.
///
/// Defines [`WorkerState`](fsm::WorkerState), the events that move a worker
/// between states and the [`InvalidTransition`](fsm::InvalidTransition)
/// error for events that arrive out of order.
pub mod fsm;

/// Metrics collection for worker observability.
///
/// When the `metrics` feature is enabled, this module provides counters
/// for:
/// - Handled fetches per class and response source
/// - Responses written back to the cache
/// - Install outcomes and deleted generations
pub mod metrics;

/// Policy configuration for interception behavior.
///
/// Defines [`PolicyConfig`](policy::PolicyConfig) with:
/// - **Asset matching**: extension allow-list only, or also every same-origin request
/// - **Navigation strategy**: network-first or cache-first
/// - **Offline fallback**: the shell document served to failed navigations
pub mod policy;

/// Registration of worker versions for one origin.
///
/// [`Registration`] promotes installed versions and routes fetches to the
/// active one.
pub mod registration;

/// Fetch strategies.
///
/// Network-first, cache-first and pass-through, as free functions over a
/// [`Cache`](shellcache_backend::Cache) and an
/// [`Upstream`](shellcache_core::Upstream).
pub mod strategy;

/// A single worker version and its lifecycle.
pub mod worker;

pub use classify::classify;
pub use config::{DEFAULT_EXTENSIONS, WorkerConfig, WorkerConfigBuilder};
pub use error::{FetchError, InstallError, WorkerError};
pub use fsm::{InvalidTransition, LifecycleEvent, WorkerState};
pub use policy::{AssetMatch, NavigationStrategy, PolicyConfig};
pub use registration::Registration;
pub use strategy::FetchOutcome;
pub use worker::{ActivateReport, OfflineWorker};

pub use shellcache_core::{
    CacheKey, CacheName, CacheRequest, FetchContext, FetchResult, Manifest, NetworkError, Origin,
    RequestClass, RequestMode, Response, ResponseSource, ResponseType, Upstream,
};

/// The `shellcache` prelude.
///
/// Provides convenient access to the most commonly used types:
///
/// ```rust
/// use shellcache::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        CacheRequest, OfflineWorker, PolicyConfig, Registration, Response, Upstream, WorkerConfig,
    };
}
