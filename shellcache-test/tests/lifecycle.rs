use pretty_assertions::assert_eq;
use shellcache::{
    InstallError, LifecycleEvent, OfflineWorker, WorkerConfig, WorkerError, WorkerState,
};
use shellcache_backend::{Cache, CacheExt, CacheStorage};
use shellcache_core::{CacheName, CacheRequest, Origin};
use shellcache_test::mock_storage::MockStorage;
use shellcache_test::mock_upstream::{MockUpstream, Route};
use shellcache_test::tracing::capture_spans;

fn origin() -> Origin {
    "http://localhost:3000".parse().unwrap()
}

fn network() -> MockUpstream {
    let network = MockUpstream::new(origin());
    network
        .serve("/", "home")
        .serve("/index.html", "index")
        .serve("/manifest.json", "{}");
    network
}

fn worker(storage: &MockStorage, name: &str) -> OfflineWorker<MockStorage> {
    let config = WorkerConfig::builder(origin(), name.into())
        .manifest(["/", "/index.html", "/manifest.json"])
        .build();
    OfflineWorker::new(config, storage.clone())
}

#[tokio::test]
async fn install_stores_every_manifest_url() {
    let storage = MockStorage::new();
    let worker = worker(&storage, "portfolio-v1");
    let mut network = network();

    let stored = worker.install(&mut network).await.unwrap();

    assert_eq!(stored, 3);
    assert_eq!(worker.state(), WorkerState::Waiting);
    let cache = storage.open(&CacheName::new("portfolio-v1")).await.unwrap();
    for path in ["/", "/index.html", "/manifest.json"] {
        let request = CacheRequest::get(origin().resolve(path).unwrap());
        assert!(cache.match_request(&request).await.unwrap().is_some(), "{path}");
    }
    assert_eq!(network.total_calls(), 3);
}

#[tokio::test]
async fn install_writes_nothing_when_one_entry_fails() {
    let storage = MockStorage::new();
    let worker = worker(&storage, "portfolio-v1");
    let mut network = network();
    network.route("/manifest.json", Route::new(http::StatusCode::NOT_FOUND, ""));

    let error = worker.install(&mut network).await.unwrap_err();

    assert!(matches!(
        error,
        WorkerError::Install(InstallError::BadStatus { status: 404, .. })
    ));
    assert_eq!(worker.state(), WorkerState::Redundant);
    assert!(!storage.inner.has(&"portfolio-v1".into()).await.unwrap());
}

#[tokio::test]
async fn install_is_idempotent() {
    let storage = MockStorage::new();
    let mut network = network();

    worker(&storage, "portfolio-v1").install(&mut network).await.unwrap();
    worker(&storage, "portfolio-v1").install(&mut network).await.unwrap();

    let cache = storage.open(&"portfolio-v1".into()).await.unwrap();
    assert_eq!(cache.keys().await.unwrap().len(), 3);
}

#[tokio::test]
async fn activate_keeps_only_the_current_generation() {
    let storage = MockStorage::new();
    storage.inner.open(&"old-v1".into()).await.unwrap();
    storage.inner.open(&"old-v2".into()).await.unwrap();
    let worker = worker(&storage, "portfolio-v3");
    worker.install(&mut network()).await.unwrap();

    let report = worker.activate().await.unwrap();

    assert_eq!(worker.state(), WorkerState::Active);
    assert_eq!(report.current, CacheName::new("portfolio-v3"));
    assert_eq!(report.deleted.len(), 2);
    assert!(report.failed.is_empty());
    assert_eq!(storage.names().await, vec![CacheName::new("portfolio-v3")]);
}

#[tokio::test]
async fn activate_tolerates_deletion_failures() {
    let storage = MockStorage::new();
    storage.inner.open(&"old-v1".into()).await.unwrap();
    storage.fail_delete("old-v1");
    let worker = worker(&storage, "portfolio-v2");
    worker.install(&mut network()).await.unwrap();

    let report = worker.activate().await.unwrap();

    assert_eq!(worker.state(), WorkerState::Active);
    assert_eq!(report.failed, vec![CacheName::new("old-v1")]);
    assert_eq!(storage.failed_delete_count(), 1);
}

#[tokio::test]
async fn activate_before_install_is_rejected() {
    let storage = MockStorage::new();
    let worker = worker(&storage, "portfolio-v1");

    let error = worker.activate().await.unwrap_err();

    match error {
        WorkerError::Transition(transition) => {
            assert_eq!(transition.from, WorkerState::Uninstalled);
            assert_eq!(transition.event, LifecycleEvent::Activate);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(storage.delete_count(), 0);
}

#[tokio::test]
async fn state_changes_are_observable() {
    let storage = MockStorage::new();
    let worker = worker(&storage, "portfolio-v1");
    let mut states = worker.subscribe();

    worker.install(&mut network()).await.unwrap();
    assert!(states.has_changed().unwrap());
    assert_eq!(*states.borrow_and_update(), WorkerState::Waiting);

    worker.activate().await.unwrap();
    assert_eq!(*states.borrow_and_update(), WorkerState::Active);
}

#[tokio::test]
async fn lifecycle_spans_are_recorded() {
    let storage = MockStorage::new();
    let worker = worker(&storage, "portfolio-v1");

    let (_, spans) = capture_spans(async {
        worker.install(&mut network()).await.unwrap();
        worker.activate().await.unwrap();
    })
    .await;

    assert!(spans.has_span("install"));
    assert!(spans.has_span("activate"));
    assert_eq!(
        spans.get_field("install", "cache"),
        Some("portfolio-v1".to_string())
    );
    assert_eq!(spans.get_field("install", "storage"), Some("mock".to_string()));
}
