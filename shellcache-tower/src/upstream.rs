//! Upstream adapter for bridging Tower services to the offline worker.
//!
//! This module provides [`TowerUpstream`], an adapter that implements the
//! [`Upstream`] trait for Tower services. The worker calls it whenever a
//! strategy needs the network.
//!
//! Users typically don't interact with this module directly: it's used
//! internally by [`OfflineCacheService`](crate::service::OfflineCacheService).

use std::marker::PhantomData;

use futures::FutureExt;
use futures::future::BoxFuture;
use http::{Request, Response};
use http_body::Body as HttpBody;
use shellcache_core::{BoxError, CacheRequest, FetchResult, NetworkError, Origin, Upstream};
use tower::{Service, ServiceExt};

/// Adapter that implements [`Upstream`] for Tower services.
///
/// Requests are sent as `http::Request<ReqBody>` with an empty
/// (`Default`) body; responses are read to the end and snapshotted.
/// Service errors and body errors both surface as
/// [`NetworkError::Upstream`].
///
/// # Type Parameters
///
/// * `S` - The Tower service being adapted
/// * `ReqBody` - Request body type
pub struct TowerUpstream<S, ReqBody> {
    service: S,
    origin: Origin,
    _phantom: PhantomData<fn(ReqBody)>,
}

impl<S, ReqBody> TowerUpstream<S, ReqBody> {
    /// Creates a new upstream adapter wrapping the given service.
    ///
    /// `origin` is the worker's origin, used to type the responses.
    pub fn new(service: S, origin: Origin) -> Self {
        Self {
            service,
            origin,
            _phantom: PhantomData,
        }
    }
}

impl<S, ReqBody> Clone for TowerUpstream<S, ReqBody>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self::new(self.service.clone(), self.origin.clone())
    }
}

impl<S, ReqBody, ResBody> Upstream<CacheRequest> for TowerUpstream<S, ReqBody>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    S::Error: Into<BoxError>,
    ReqBody: Default + Send + 'static,
    ResBody: HttpBody + Send + 'static,
    ResBody::Data: Send,
    ResBody::Error: Into<BoxError>,
{
    type Response = FetchResult;
    type Future = BoxFuture<'static, FetchResult>;

    fn call(&mut self, req: CacheRequest) -> Self::Future {
        let service = self.service.clone();
        let origin = self.origin.clone();
        async move {
            let http_request = shellcache_http::into_http_request::<ReqBody>(req.clone());
            let response = service
                .oneshot(http_request)
                .await
                .map_err(|error| NetworkError::upstream(&req, error))?;
            shellcache_http::collect_response(response, &req, &origin)
                .await
                .map_err(|error| NetworkError::upstream(&req, error))
        }
        .boxed()
    }
}
