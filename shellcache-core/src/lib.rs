#![warn(missing_docs)]
//! # shellcache-core
//!
//! Core types and traits for the shellcache offline asset cache.
//!
//! This crate defines the vocabulary shared by the storage backends, the
//! worker and the HTTP integrations:
//!
//! - **Requests** ([`CacheRequest`], [`RequestMode`], [`RequestClass`]) as
//!   seen by the worker for every request the controlled page issues
//! - **Responses** ([`Response`], [`ResponseType`]) as read-once buffered
//!   snapshots with an explicit [`Response::duplicate`]
//! - **Keys and generations** ([`CacheKey`], [`CacheName`]) identifying
//!   entries and version-stamped caches
//! - **The shell** ([`Manifest`], [`Origin`]) preloaded at install time
//! - **The network** ([`Upstream`], [`NetworkError`]) the worker falls back to
//! - **Outcome reporting** ([`FetchContext`], [`ResponseSource`])

pub mod context;
pub mod generation;
pub mod key;
pub mod manifest;
pub mod origin;
pub mod request;
pub mod response;
pub mod upstream;

pub use context::{FetchContext, ResponseSource};
pub use generation::CacheName;
pub use key::CacheKey;
pub use manifest::Manifest;
pub use origin::{Origin, OriginError};
pub use request::{CacheRequest, RequestClass, RequestMode};
pub use response::{Response, ResponseType};
#[doc(hidden)]
pub use smol_str::SmolStr;
pub use upstream::{BoxError, FetchResult, NetworkError, Upstream, UpstreamFn, upstream_fn};

/// Raw byte data type used for response bodies.
/// Using `Bytes` provides efficient zero-copy cloning via reference counting.
pub type Raw = bytes::Bytes;
