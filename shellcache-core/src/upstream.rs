//! Network seam used when the cache cannot answer.

use std::error::Error as StdError;
use std::future::Future;

use thiserror::Error;

use crate::request::CacheRequest;
use crate::response::Response;

/// Boxed error type used to carry transport failures.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// A network fetch failed before a response was received.
///
/// An HTTP error status is **not** a network error: it arrives as a
/// [`Response`] and is handled by the cacheability rules instead.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The network is unavailable (offline, DNS failure, refused connection).
    #[error("network unreachable for {url}")]
    Unreachable {
        /// The URL that could not be fetched.
        url: String,
    },
    /// The transport returned an error.
    #[error("upstream request to {url} failed: {source}")]
    Upstream {
        /// The URL that could not be fetched.
        url: String,
        /// The transport error.
        #[source]
        source: BoxError,
    },
}

impl NetworkError {
    /// Creates a [`NetworkError::Unreachable`] for the request's URL.
    pub fn unreachable(request: &CacheRequest) -> Self {
        NetworkError::Unreachable {
            url: request.uri().to_string(),
        }
    }

    /// Wraps a transport error for the request's URL.
    pub fn upstream(request: &CacheRequest, source: impl Into<BoxError>) -> Self {
        NetworkError::Upstream {
            url: request.uri().to_string(),
            source: source.into(),
        }
    }
}

/// Result of a network fetch.
pub type FetchResult = Result<Response, NetworkError>;

/// Trait for calling the network with intercepted requests.
/// This trait is transport-agnostic and can be implemented for any async client.
///
/// # Examples
///
/// ```rust
/// use shellcache_core::{CacheRequest, FetchResult, Response, Upstream};
/// use std::future::Ready;
///
/// #[derive(Clone)]
/// struct Static;
///
/// impl Upstream<CacheRequest> for Static {
///     type Response = FetchResult;
///     type Future = Ready<FetchResult>;
///
///     fn call(&mut self, _req: CacheRequest) -> Self::Future {
///         std::future::ready(Ok(Response::ok("hello")))
///     }
/// }
/// ```
pub trait Upstream<Req> {
    /// The response type returned by the network
    type Response;

    /// The future that resolves to the response
    type Future: Future<Output = Self::Response> + Send;

    /// Call the network with the given request
    fn call(&mut self, req: Req) -> Self::Future;
}

/// [`Upstream`] implemented by a closure, see [`upstream_fn`].
#[derive(Clone, Copy, Debug)]
pub struct UpstreamFn<F> {
    f: F,
}

/// Wraps a closure returning a future into an [`Upstream`].
///
/// ```rust
/// use shellcache_core::{CacheRequest, NetworkError, Upstream, upstream_fn};
///
/// let offline = upstream_fn(|req: CacheRequest| async move {
///     Err::<shellcache_core::Response, _>(NetworkError::unreachable(&req))
/// });
/// # let _ = offline;
/// ```
pub fn upstream_fn<F>(f: F) -> UpstreamFn<F> {
    UpstreamFn { f }
}

impl<F, Fut, Req> Upstream<Req> for UpstreamFn<F>
where
    F: FnMut(Req) -> Fut,
    Fut: Future + Send,
{
    type Response = Fut::Output;
    type Future = Fut;

    fn call(&mut self, req: Req) -> Self::Future {
        (self.f)(req)
    }
}
