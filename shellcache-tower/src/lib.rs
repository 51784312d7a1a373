//! Tower middleware integration for shellcache.
//!
//! This crate provides [`OfflineCache`], a Tower [`Layer`] that puts the
//! active offline worker of a [`Registration`] in front of any Tower HTTP
//! service. The wrapped service plays the network.
//!
//! # When to Use This Crate
//!
//! Use `shellcache-tower` when the site's assets are served (or proxied) by
//! a Tower-based service and the offline behavior should apply to it:
//!
//! - **Server-side**: wrap an Axum router or a Hyper service
//! - **Client-side**: wrap an HTTP client service so a shell app keeps
//!   working when its origin is unreachable
//!
//! # Request Flow
//!
//! 1. Without an active worker, or when the worker classifies the request as
//!    pass-through, the request goes to the inner service untouched,
//!    body included.
//! 2. Otherwise the request is converted with
//!    [`shellcache_http::cache_request`] and answered by the worker's
//!    strategy; the inner service is called through [`TowerUpstream`] when
//!    the strategy needs the network.
//! 3. Intercepted responses carry an `x-shellcache-source` header
//!    (`network`, `cache` or `offline-shell`).
//!
//! Network failures the worker cannot recover from are returned as the
//! service error.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use shellcache::{Registration, WorkerConfig};
//! use shellcache_backend::MemoryStorage;
//! use shellcache_tower::OfflineCache;
//! use tower::{Layer, service_fn};
//!
//! # async fn handler(
//! #     _req: http::Request<String>,
//! # ) -> Result<http::Response<String>, std::convert::Infallible> {
//! #     Ok(http::Response::new(String::from("<html>")))
//! # }
//! let registration = Arc::new(Registration::new(MemoryStorage::new()));
//! let service = OfflineCache::new(Arc::clone(&registration)).layer(service_fn(handler));
//! # let _ = service;
//! ```
//!
//! [`Layer`]: tower::Layer
//! [`Registration`]: shellcache::Registration

pub mod layer;
pub mod service;
pub mod upstream;

pub use layer::OfflineCache;
pub use service::OfflineCacheService;
pub use upstream::TowerUpstream;
