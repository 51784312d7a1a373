//! Fetch strategies.
//!
//! Each strategy takes the (optional) opened cache generation, the request
//! and the network, and returns the response together with a
//! [`FetchContext`] describing where it came from. A cache that could not be
//! opened is passed as `None` and behaves as an empty cache that refuses
//! writes.
//!
//! Network responses are read once: a copy is made with
//! [`Response::duplicate`] before one goes to the cache and the other to the
//! caller.

use shellcache_backend::{Cache, CacheExt};
use shellcache_core::{
    CacheRequest, FetchContext, FetchResult, Origin, RequestClass, Response, ResponseSource,
    Upstream,
};
use tracing::{debug, warn};

use crate::error::FetchError;

/// Result of one intercepted fetch and the context describing it.
pub type FetchOutcome = (Result<Response, FetchError>, FetchContext);

/// Sends the request to the network untouched.
pub async fn pass_through<U>(request: CacheRequest, upstream: &mut U) -> FetchOutcome
where
    U: Upstream<CacheRequest, Response = FetchResult>,
{
    let mut ctx = FetchContext::new(RequestClass::Passthrough);
    ctx.network_attempted = true;
    let result = upstream.call(request).await.map_err(FetchError::from);
    (result, ctx)
}

/// Network-first.
///
/// A network response is returned as is; when cacheable, a copy overwrites
/// the entry for the request. On network failure the entry for the exact
/// request is served, then the `shell` entry if one is given. Without either
/// the fetch fails with [`FetchError::NoFallback`].
pub async fn network_first<C, U>(
    cache: Option<&C>,
    origin: &Origin,
    class: RequestClass,
    request: CacheRequest,
    upstream: &mut U,
    shell: Option<&CacheRequest>,
) -> FetchOutcome
where
    C: Cache,
    U: Upstream<CacheRequest, Response = FetchResult>,
{
    let mut ctx = FetchContext::new(class);
    ctx.network_attempted = true;

    match upstream.call(request.clone()).await {
        Ok(response) => {
            ctx.stored = store(cache, origin, &request, &response).await;
            (Ok(response), ctx)
        }
        Err(error) => {
            warn!(url = %request.uri(), %error, "network failed, falling back to cache");
            if let Some(cache) = cache {
                if let Some(cached) = lookup(cache, &request).await {
                    ctx.source = ResponseSource::Cache(cache.name().clone());
                    return (Ok(cached), ctx);
                }
                if let Some(shell) = shell
                    && let Some(response) = offline_shell(cache, shell).await
                {
                    ctx.source = ResponseSource::OfflineShell(cache.name().clone());
                    return (Ok(response), ctx);
                }
            }
            let url = request.uri().to_string();
            (Err(FetchError::NoFallback { url, source: error }), ctx)
        }
    }
}

/// Cache-first.
///
/// A hit is returned without touching the network. On a miss the network
/// answers; a cacheable response is stored before being returned, anything
/// else is returned unmodified. When the network fails and `shell` is given
/// the shell entry is served, otherwise the network error propagates.
pub async fn cache_first<C, U>(
    cache: Option<&C>,
    origin: &Origin,
    class: RequestClass,
    request: CacheRequest,
    upstream: &mut U,
    shell: Option<&CacheRequest>,
) -> FetchOutcome
where
    C: Cache,
    U: Upstream<CacheRequest, Response = FetchResult>,
{
    let mut ctx = FetchContext::new(class);

    if let Some(cache) = cache
        && let Some(cached) = lookup(cache, &request).await
    {
        debug!(url = %request.uri(), cache = %cache.name(), "cache hit");
        ctx.source = ResponseSource::Cache(cache.name().clone());
        return (Ok(cached), ctx);
    }
    debug!(url = %request.uri(), "cache miss");

    ctx.network_attempted = true;
    match upstream.call(request.clone()).await {
        Ok(response) => {
            ctx.stored = store(cache, origin, &request, &response).await;
            (Ok(response), ctx)
        }
        Err(error) => {
            if let (Some(cache), Some(shell)) = (cache, shell) {
                if let Some(response) = offline_shell(cache, shell).await {
                    ctx.source = ResponseSource::OfflineShell(cache.name().clone());
                    return (Ok(response), ctx);
                }
                let url = request.uri().to_string();
                return (Err(FetchError::NoFallback { url, source: error }), ctx);
            }
            (Err(FetchError::Network(error)), ctx)
        }
    }
}

/// Returns `true` if `response` to `request` may be written to the cache:
/// status 200, basic type, not redirected, and the request targets `origin`.
pub fn is_storable(origin: &Origin, request: &CacheRequest, response: &Response) -> bool {
    response.is_cacheable() && origin.is_same_origin(request.uri())
}

async fn lookup<C>(cache: &C, request: &CacheRequest) -> Option<Response>
where
    C: Cache,
{
    match cache.match_request(request).await {
        Ok(found) => found,
        Err(error) => {
            warn!(url = %request.uri(), cache = %cache.name(), %error, "cache read failed");
            None
        }
    }
}

async fn offline_shell<C>(cache: &C, shell: &CacheRequest) -> Option<Response>
where
    C: Cache,
{
    let response = lookup(cache, shell).await;
    match response {
        Some(_) => warn!(shell = %shell.uri(), "serving offline shell"),
        None => warn!(shell = %shell.uri(), "offline shell is not cached"),
    }
    response
}

async fn store<C>(
    cache: Option<&C>,
    origin: &Origin,
    request: &CacheRequest,
    response: &Response,
) -> bool
where
    C: Cache,
{
    if !is_storable(origin, request, response) {
        debug!(
            url = %request.uri(),
            status = %response.status(),
            kind = ?response.kind(),
            "response not cacheable"
        );
        return false;
    }
    let Some(cache) = cache else {
        return false;
    };
    match cache.put(request, response.duplicate()).await {
        Ok(()) => {
            debug!(url = %request.uri(), cache = %cache.name(), "stored response");
            true
        }
        Err(error) => {
            warn!(url = %request.uri(), cache = %cache.name(), %error, "cache write failed");
            false
        }
    }
}
