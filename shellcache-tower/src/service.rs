use std::sync::Arc;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::BoxFuture;
use http::header::HeaderName;
use http::{Request, Response};
use http_body::Body as HttpBody;
use shellcache::Registration;
use shellcache_backend::CacheStorage;
use shellcache_core::{BoxError, RequestClass};
use shellcache_http::{CacheStatusExt, ShellBody};
use tower::{Service, ServiceExt};
use tracing::debug;

use crate::upstream::TowerUpstream;

/// Service produced by [`OfflineCache`](crate::OfflineCache).
pub struct OfflineCacheService<S, St> {
    inner: S,
    registration: Arc<Registration<St>>,
    status_header: HeaderName,
}

impl<S, St> OfflineCacheService<S, St> {
    /// Wraps `inner` with the registration's active worker.
    pub fn new(inner: S, registration: Arc<Registration<St>>, status_header: HeaderName) -> Self {
        OfflineCacheService {
            inner,
            registration,
            status_header,
        }
    }
}

impl<S, St> Clone for OfflineCacheService<S, St>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            registration: Arc::clone(&self.registration),
            status_header: self.status_header.clone(),
        }
    }
}

impl<S, St, ReqBody, ResBody> Service<Request<ReqBody>> for OfflineCacheService<S, St>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    S::Error: Into<BoxError>,
    St: CacheStorage + Clone + 'static,
    ReqBody: Default + Send + 'static,
    ResBody: HttpBody + Send + 'static,
    ResBody::Data: Send,
    ResBody::Error: Into<BoxError>,
{
    type Response = Response<ShellBody<ResBody>>;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // Keep the service that was polled ready for the pass-through call.
        let clone = self.inner.clone();
        let inner = std::mem::replace(&mut self.inner, clone);
        let registration = Arc::clone(&self.registration);
        let status_header = self.status_header.clone();

        async move {
            let Some(worker) = registration.active().await else {
                return pass_through(inner, req).await;
            };
            let (parts, body) = req.into_parts();
            let request = match shellcache_http::cache_request(&parts, worker.config().origin()) {
                Ok(request) => request,
                Err(error) => {
                    debug!(uri = %parts.uri, %error, "request target not resolvable");
                    return pass_through(inner, Request::from_parts(parts, body)).await;
                }
            };
            let class = worker.route(&request);
            if class == RequestClass::Passthrough {
                return pass_through(inner, Request::from_parts(parts, body)).await;
            }

            let mut upstream = TowerUpstream::<S, ReqBody>::new(inner, worker.config().origin().clone());
            let (result, ctx) = worker.respond(class, request, &mut upstream).await;
            let mut response = shellcache_http::into_http_response(result?);
            response.cache_status(&ctx, &status_header);
            Ok(response)
        }
        .boxed()
    }
}

async fn pass_through<S, ReqBody, ResBody>(
    inner: S,
    req: Request<ReqBody>,
) -> Result<Response<ShellBody<ResBody>>, BoxError>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Error: Into<BoxError>,
{
    let response = inner.oneshot(req).await.map_err(Into::<BoxError>::into)?;
    Ok(response.map(ShellBody::Passthrough))
}
