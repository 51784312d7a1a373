use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use axum::Router;
use axum::body::Body;
use axum::routing::{get, post};
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use shellcache::{PolicyConfig, Registration, WorkerConfig};
use shellcache_backend::MemoryStorage;
use shellcache_core::Origin;
use shellcache_tower::{OfflineCache, TowerUpstream};
use tower::{ServiceBuilder, ServiceExt, service_fn};

#[derive(Clone, Default)]
struct Site {
    offline: Arc<AtomicBool>,
    api_calls: Arc<AtomicUsize>,
}

fn router(site: Site) -> Router {
    let api_calls = Arc::clone(&site.api_calls);
    Router::new()
        .route("/", get(|| async { ([(header::CONTENT_TYPE, "text/html")], "<h1>portfolio</h1>") }))
        .route("/index.html", get(|| async { "<h1>portfolio</h1>" }))
        .route("/styles.css", get(|| async { ([(header::CONTENT_TYPE, "text/css")], "body{}") }))
        .route(
            "/api/data",
            post(move || {
                let api_calls = Arc::clone(&api_calls);
                async move {
                    api_calls.fetch_add(1, Ordering::SeqCst);
                    "{\"saved\":true}"
                }
            }),
        )
}

/// The site behind a switchable network connection.
fn network(
    site: Site,
) -> impl tower::Service<
    Request<Body>,
    Response = http::Response<Body>,
    Error = io::Error,
    Future = impl Future<Output = io::Result<http::Response<Body>>> + Send + 'static,
> + Clone
+ Send
+ Sync
+ 'static {
    let router = router(site.clone());
    service_fn(move |req: Request<Body>| {
        let router = router.clone();
        let offline = Arc::clone(&site.offline);
        async move {
            if offline.load(Ordering::SeqCst) {
                return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "offline"));
            }
            router.oneshot(req).await.map_err(|never| match never {})
        }
    })
}

fn origin() -> Origin {
    "http://localhost:3000".parse().unwrap()
}

async fn registration(site: &Site, policy: PolicyConfig) -> Arc<Registration<MemoryStorage>> {
    let registration = Arc::new(Registration::new(MemoryStorage::new()));
    let config = WorkerConfig::builder(origin(), "portfolio-v1".into())
        .manifest(["/", "/index.html"])
        .policy(policy)
        .build();
    let mut upstream = TowerUpstream::<_, Body>::new(network(site.clone()), origin());
    registration.register(config, &mut upstream).await.unwrap();
    registration
}

async fn text(response: http::Response<impl http_body::Body<Error = impl std::fmt::Debug>>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn portfolio_keeps_working_offline() {
    let site = Site::default();
    let registration = registration(&site, PolicyConfig::advanced()).await;
    let service = ServiceBuilder::new()
        .layer(OfflineCache::new(registration))
        .service(network(site.clone()));

    let response = service
        .clone()
        .oneshot(Request::get("/styles.css").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.headers()["x-shellcache-source"], "network");
    assert_eq!(text(response).await, "body{}");

    site.offline.store(true, Ordering::SeqCst);

    let response = service
        .clone()
        .oneshot(Request::get("/styles.css").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.headers()["x-shellcache-source"], "cache");
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");

    let page = Request::get("/")
        .header("sec-fetch-mode", "navigate")
        .body(Body::empty())
        .unwrap();
    let response = service.oneshot(page).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-shellcache-source"], "cache");
    assert_eq!(text(response).await, "<h1>portfolio</h1>");
}

#[tokio::test]
async fn simple_policy_answers_unknown_pages_with_the_shell() {
    let site = Site::default();
    let registration = registration(&site, PolicyConfig::simple("/index.html")).await;
    let service = ServiceBuilder::new()
        .layer(OfflineCache::new(registration))
        .service(network(site.clone()));
    site.offline.store(true, Ordering::SeqCst);

    let page = Request::get("/projects/1")
        .header(header::ACCEPT, "text/html,application/xhtml+xml")
        .body(Body::empty())
        .unwrap();
    let response = service.oneshot(page).await.unwrap();

    assert_eq!(response.headers()["x-shellcache-source"], "offline-shell");
    assert_eq!(text(response).await, "<h1>portfolio</h1>");
}

#[tokio::test]
async fn posts_reach_the_site_with_their_body() {
    let site = Site::default();
    let registration = registration(&site, PolicyConfig::advanced()).await;
    let service = ServiceBuilder::new()
        .layer(OfflineCache::new(registration).status_header(
            http::HeaderName::from_static("x-offline-source"),
        ))
        .service(network(site.clone()));

    let response = service
        .oneshot(
            Request::post("/api/data")
                .body(Body::from("{\"visits\":1}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.headers().get("x-offline-source").is_none());
    assert_eq!(text(response).await, "{\"saved\":true}");
    assert_eq!(site.api_calls.load(Ordering::SeqCst), 1);
}
