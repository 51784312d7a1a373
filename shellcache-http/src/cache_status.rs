//! Cache status extension for HTTP responses.
//!
//! Attaches the source of an intercepted response (`network`, `cache` or
//! `offline-shell`) as a header.

use http::{HeaderValue, Response, header::HeaderName};
use shellcache_core::FetchContext;

/// Default header name for the response source.
///
/// The value is `x-shellcache-source`. Use builder methods on the offline
/// cache layer to customize the header name.
pub const DEFAULT_CACHE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-shellcache-source");

/// Attach the source of a response as a header.
pub trait CacheStatusExt {
    /// Sets `header` to the source recorded in `ctx`.
    fn cache_status(&mut self, ctx: &FetchContext, header: &HeaderName);
}

impl<B> CacheStatusExt for Response<B> {
    fn cache_status(&mut self, ctx: &FetchContext, header: &HeaderName) {
        self.headers_mut()
            .insert(header.clone(), HeaderValue::from_static(ctx.source.as_str()));
    }
}
