use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use futures::future::join_all;
use http::{HeaderValue, header};
use shellcache::{OfflineWorker, ResponseSource, WorkerConfig};
use shellcache_backend::{Cache, CacheStorage, MemoryStorage};
use shellcache_core::{
    CacheName, CacheRequest, FetchResult, NetworkError, Origin, Response, ResponseType, Upstream,
    upstream_fn,
};

fn origin() -> Origin {
    "https://portfolio.example".parse().unwrap()
}

#[derive(Clone, Default)]
struct Network {
    offline: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl Network {
    fn upstream(&self) -> impl Upstream<CacheRequest, Response = FetchResult> + Clone {
        let network = self.clone();
        upstream_fn(move |req: CacheRequest| {
            let network = network.clone();
            async move {
                network.calls.fetch_add(1, Ordering::SeqCst);
                if network.offline.load(Ordering::SeqCst) {
                    return Err(NetworkError::unreachable(&req));
                }
                let kind = if origin().is_same_origin(req.uri()) {
                    ResponseType::Basic
                } else {
                    ResponseType::Cors
                };
                Ok(Response::ok(req.uri().path().to_owned())
                    .with_type(kind)
                    .with_url(req.uri().clone()))
            }
        })
    }
}

async fn active(storage: &MemoryStorage, network: &Network) -> OfflineWorker<MemoryStorage> {
    let config = WorkerConfig::builder(origin(), "portfolio-v1".into())
        .manifest(["/", "/index.html"])
        .build();
    let worker = OfflineWorker::new(config, storage.clone());
    worker.install(&mut network.upstream()).await.unwrap();
    worker.activate().await.unwrap();
    network.calls.store(0, Ordering::SeqCst);
    worker
}

fn asset(path: &str) -> CacheRequest {
    CacheRequest::get(origin().resolve(path).unwrap())
}

#[tokio::test]
async fn served_copies_are_independent_of_the_cache() {
    let storage = MemoryStorage::new();
    let network = Network::default();
    let worker = active(&storage, &network).await;
    let mut upstream = network.upstream();

    let (first, _) = worker.handle_fetch(asset("/app.js"), &mut upstream).await;
    let mut first = first.unwrap();
    first
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));

    let (second, ctx) = worker.handle_fetch(asset("/app.js"), &mut upstream).await;
    let second = second.unwrap();

    assert_eq!(ctx.source, ResponseSource::Cache(CacheName::new("portfolio-v1")));
    assert!(second.headers().get(header::CACHE_CONTROL).is_none());
    assert_eq!(second.body(), first.body());
    assert_eq!(network.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_fetches_of_one_asset_leave_one_entry() {
    let storage = MemoryStorage::new();
    let network = Network::default();
    let worker = active(&storage, &network).await;

    let fetches = (0..8).map(|_| {
        let mut upstream = network.upstream();
        let worker = &worker;
        async move { worker.handle_fetch(asset("/styles.css"), &mut upstream).await }
    });
    let outcomes = join_all(fetches).await;

    for (result, _) in outcomes {
        assert_eq!(result.unwrap().body().as_ref(), b"/styles.css");
    }
    let cache = storage.open(&"portfolio-v1".into()).await.unwrap();
    assert_eq!(cache.keys().await.unwrap().len(), 3);
}

#[tokio::test]
async fn cross_origin_assets_are_never_stored() {
    let storage = MemoryStorage::new();
    let network = Network::default();
    let worker = active(&storage, &network).await;
    let mut upstream = network.upstream();
    let font = CacheRequest::get("https://fonts.example/inter.woff2".parse().unwrap());

    let (result, ctx) = worker.handle_fetch(font.clone(), &mut upstream).await;
    assert!(result.is_ok());
    assert!(!ctx.stored);

    network.offline.store(true, Ordering::SeqCst);
    let (result, _) = worker.handle_fetch(font, &mut upstream).await;
    assert!(result.is_err());
}
