use std::sync::Arc;

use http::header::HeaderName;
use shellcache::Registration;
use shellcache_http::DEFAULT_CACHE_STATUS_HEADER;
use tower::Layer;

use crate::service::OfflineCacheService;

/// Tower [`Layer`] putting a [`Registration`] in front of a service.
///
/// The wrapped service plays the network: pass-through requests go to it
/// unchanged, and the active worker calls it whenever a strategy needs a
/// fresh response.
pub struct OfflineCache<St> {
    registration: Arc<Registration<St>>,
    status_header: HeaderName,
}

impl<St> OfflineCache<St> {
    /// Creates the layer for `registration`.
    pub fn new(registration: Arc<Registration<St>>) -> Self {
        Self {
            registration,
            status_header: DEFAULT_CACHE_STATUS_HEADER,
        }
    }

    /// Sets the header carrying the response source on intercepted responses.
    pub fn status_header(mut self, header: HeaderName) -> Self {
        self.status_header = header;
        self
    }

    /// The registration requests are routed through.
    pub fn registration(&self) -> &Arc<Registration<St>> {
        &self.registration
    }
}

impl<St> Clone for OfflineCache<St> {
    fn clone(&self) -> Self {
        Self {
            registration: Arc::clone(&self.registration),
            status_header: self.status_header.clone(),
        }
    }
}

impl<S, St> Layer<S> for OfflineCache<St> {
    type Service = OfflineCacheService<S, St>;

    fn layer(&self, inner: S) -> Self::Service {
        OfflineCacheService::new(
            inner,
            Arc::clone(&self.registration),
            self.status_header.clone(),
        )
    }
}
