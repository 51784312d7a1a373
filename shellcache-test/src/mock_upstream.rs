use std::future::{Ready, ready};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use bytes::Bytes;
use dashmap::DashMap;
use http::{HeaderValue, StatusCode, header};
use shellcache_core::{
    CacheRequest, FetchResult, NetworkError, Origin, Response, ResponseType, Upstream,
};

/// Scripted answer for one URL.
#[derive(Debug, Clone)]
pub struct Route {
    pub status: StatusCode,
    pub body: Bytes,
    pub content_type: Option<&'static str>,
    pub kind: Option<ResponseType>,
    pub redirected: bool,
}

impl Route {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: None,
            kind: None,
            redirected: false,
        }
    }

    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    pub fn content_type(mut self, content_type: &'static str) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn kind(mut self, kind: ResponseType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn redirected(mut self) -> Self {
        self.redirected = true;
        self
    }
}

#[derive(Debug, Default)]
struct NetworkState {
    routes: DashMap<String, Route>,
    calls: DashMap<String, usize>,
    total: AtomicUsize,
    offline: AtomicBool,
}

/// Scripted network for the worker.
///
/// Routes are registered by root-relative path or absolute URL. Unknown URLs
/// answer `404`. While offline every call fails with
/// [`NetworkError::Unreachable`] but is still counted.
#[derive(Debug, Clone)]
pub struct MockUpstream {
    origin: Origin,
    state: Arc<NetworkState>,
}

impl MockUpstream {
    pub fn new(origin: Origin) -> Self {
        Self {
            origin,
            state: Arc::new(NetworkState::default()),
        }
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    fn url(&self, path: &str) -> String {
        self.origin
            .resolve(path)
            .map(|uri| uri.to_string())
            .unwrap_or_else(|_| path.to_owned())
    }

    pub fn route(&self, path: &str, route: Route) -> &Self {
        self.state.routes.insert(self.url(path), route);
        self
    }

    /// Shortcut for a `200 OK` route.
    pub fn serve(&self, path: &str, body: impl Into<Bytes>) -> &Self {
        self.route(path, Route::ok(body))
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.offline.store(offline, Ordering::SeqCst);
    }

    pub fn is_offline(&self) -> bool {
        self.state.offline.load(Ordering::SeqCst)
    }

    /// Number of calls made for `path`.
    pub fn calls(&self, path: &str) -> usize {
        self.state
            .calls
            .get(&self.url(path))
            .map(|count| *count)
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.state.total.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) {
        self.state.calls.clear();
        self.state.total.store(0, Ordering::SeqCst);
    }

    fn respond(&self, request: &CacheRequest) -> FetchResult {
        let url = request.uri().to_string();
        *self.state.calls.entry(url.clone()).or_default() += 1;
        self.state.total.fetch_add(1, Ordering::SeqCst);

        if self.is_offline() {
            return Err(NetworkError::unreachable(request));
        }

        let route = self
            .state
            .routes
            .get(&url)
            .map(|route| route.clone())
            .unwrap_or_else(|| Route::new(StatusCode::NOT_FOUND, "not found"));

        let kind = route.kind.unwrap_or_else(|| {
            if self.origin.is_same_origin(request.uri()) {
                ResponseType::Basic
            } else {
                ResponseType::Cors
            }
        });
        let mut response = Response::new(route.status, route.body)
            .with_type(kind)
            .with_url(request.uri().clone())
            .with_redirected(route.redirected);
        if let Some(content_type) = route.content_type {
            response = response.with_header(
                header::CONTENT_TYPE,
                HeaderValue::from_static(content_type),
            );
        }
        Ok(response)
    }
}

impl Upstream<CacheRequest> for MockUpstream {
    type Response = FetchResult;
    type Future = Ready<FetchResult>;

    fn call(&mut self, req: CacheRequest) -> Self::Future {
        ready(self.respond(&req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream() -> MockUpstream {
        MockUpstream::new("http://localhost:3000".parse().unwrap())
    }

    #[tokio::test]
    async fn serves_routes_and_counts_calls() {
        let mut network = upstream();
        network.serve("/styles.css", "body{}");

        let request = CacheRequest::get("http://localhost:3000/styles.css".parse().unwrap());
        let response = network.call(request).await.unwrap();

        assert_eq!(response.body(), &Bytes::from_static(b"body{}"));
        assert_eq!(response.kind(), ResponseType::Basic);
        assert_eq!(network.calls("/styles.css"), 1);
        assert_eq!(network.total_calls(), 1);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let mut network = upstream();
        let request = CacheRequest::get("http://localhost:3000/missing.png".parse().unwrap());
        let response = network.call(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn offline_fails_every_call() {
        let mut network = upstream();
        network.serve("/", "<html>");
        network.set_offline(true);

        let request = CacheRequest::navigate("http://localhost:3000/".parse().unwrap());
        let error = network.call(request).await.unwrap_err();

        assert!(matches!(error, NetworkError::Unreachable { .. }));
        assert_eq!(network.calls("/"), 1);
    }
}
