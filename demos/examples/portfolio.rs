//! Portfolio Offline Example
//!
//! Serves a small portfolio site through the shellcache offline layer. The
//! site itself is an Axum router standing behind a switchable "network", so
//! the offline behavior can be tried with curl.
//!
//! Features shown:
//! - YAML worker configuration validated into a `WorkerConfig`
//! - Install (manifest precache) and activation through a `Registration`
//! - Network-first pages with an offline shell, cache-first assets
//! - Pass-through of API calls
//!
//! Run:
//!   cargo run -p shellcache-demos --example portfolio
//!
//! Endpoints:
//!   - http://localhost:3000/                  - Home page (network-first)
//!   - http://localhost:3000/styles.css        - Stylesheet (cache-first)
//!   - http://localhost:3000/api/visits        - Visit counter (pass-through)
//!   - POST http://localhost:3000/__network/offline - Cut the network
//!   - POST http://localhost:3000/__network/online  - Restore the network
//!
//! Try it:
//!   curl -v -H 'Sec-Fetch-Mode: navigate' http://localhost:3000/
//!   curl -X POST http://localhost:3000/__network/offline
//!   curl -v -H 'Sec-Fetch-Mode: navigate' http://localhost:3000/    # served from cache
//!   curl -v -H 'Sec-Fetch-Mode: navigate' http://localhost:3000/about  # offline shell
//!   curl -v http://localhost:3000/api/visits                          # fails

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use axum::body::Body;
use axum::routing::get;
use axum::{Json, Router};
use http::{Method, Request, Response, StatusCode, header};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use hyper_util::service::TowerToHyperService;
use shellcache::Registration;
use shellcache_backend::MemoryStorage;
use shellcache_configuration::ConfigWorker;
use shellcache_core::BoxError;
use shellcache_tower::{OfflineCache, TowerUpstream};
use tokio::net::TcpListener;
use tower::{ServiceBuilder, ServiceExt, service_fn};

const CONFIG: &str = r#"
origin: "http://localhost:3000"
cache_name: portfolio-v1
manifest:
  - /
  - /index.html
  - /styles.css
  - /app.js
policy:
  assets: Extensions
  navigation: NetworkFirst
  offline_fallback: /index.html
"#;

const PAGE: &str = r#"<!doctype html>
<html>
  <head><link rel="stylesheet" href="/styles.css"><script src="/app.js"></script></head>
  <body><h1>Portfolio</h1></body>
</html>"#;

fn site() -> Router {
    let visits = Arc::new(AtomicU64::new(0));
    Router::new()
        .route("/", get(|| async { ([(header::CONTENT_TYPE, "text/html")], PAGE) }))
        .route("/index.html", get(|| async { ([(header::CONTENT_TYPE, "text/html")], PAGE) }))
        .route(
            "/styles.css",
            get(|| async { ([(header::CONTENT_TYPE, "text/css")], "h1 { color: teal; }") }),
        )
        .route(
            "/app.js",
            get(|| async { ([(header::CONTENT_TYPE, "text/javascript")], "console.log('hi')") }),
        )
        .route(
            "/api/visits",
            get(move || {
                let visits = Arc::clone(&visits);
                async move { Json(visits.fetch_add(1, Ordering::Relaxed) + 1) }
            }),
        )
}

fn plain(status: StatusCode, body: &'static str) -> Response<Body> {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let subscriber = tracing_subscriber::fmt()
        .pretty()
        .with_env_filter("info,shellcache=debug")
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // The "network": the site, unless the connection is cut.
    let offline = Arc::new(AtomicBool::new(false));
    let network = {
        let router = site();
        let offline = Arc::clone(&offline);
        service_fn(move |req: Request<Body>| {
            let router = router.clone();
            let offline = offline.load(Ordering::SeqCst);
            async move {
                if offline {
                    return Err(io::Error::new(io::ErrorKind::NotConnected, "network is offline"));
                }
                router.oneshot(req).await.map_err(|never| match never {})
            }
        })
    };

    // Install and activate the first version.
    let config = ConfigWorker::from_yaml(CONFIG)?.into_config()?;
    let registration = Arc::new(Registration::new(MemoryStorage::new()));
    let mut upstream = TowerUpstream::<_, Body>::new(network.clone(), config.origin().clone());
    let worker = registration.register(config, &mut upstream).await?;
    tracing::info!(cache = %worker.cache_name(), state = %worker.state(), "worker ready");

    let cached = ServiceBuilder::new()
        .layer(OfflineCache::new(Arc::clone(&registration)))
        .service(network);

    let service = service_fn(move |req: Request<Incoming>| {
        let cached = cached.clone();
        let offline = Arc::clone(&offline);
        async move {
            let toggle = match (req.method(), req.uri().path()) {
                (&Method::POST, "/__network/offline") => Some(true),
                (&Method::POST, "/__network/online") => Some(false),
                _ => None,
            };
            if let Some(state) = toggle {
                offline.store(state, Ordering::SeqCst);
                tracing::info!(offline = state, "network toggled");
                return Ok::<_, BoxError>(plain(StatusCode::NO_CONTENT, ""));
            }
            match cached.oneshot(req.map(Body::new)).await {
                Ok(response) => Ok(response.map(Body::new)),
                Err(error) => {
                    tracing::warn!(%error, "request failed");
                    Ok(plain(StatusCode::BAD_GATEWAY, "offline and not cached"))
                }
            }
        }
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let svc = service.clone();
        let hyper_service = TowerToHyperService::new(svc);
        let connection: Pin<Box<dyn Future<Output = Result<(), hyper::Error>> + Send>> =
            Box::pin(http1::Builder::new().serve_connection(io, hyper_service));

        tokio::task::spawn(async move {
            if let Err(err) = connection.await {
                tracing::error!(?err, "Error serving connection");
            }
        });
    }
}
