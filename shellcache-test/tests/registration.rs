use std::sync::Arc;

use pretty_assertions::assert_eq;
use shellcache::{Registration, RequestClass, ResponseSource, WorkerConfig, WorkerState};
use shellcache_core::{CacheName, CacheRequest, Origin};
use shellcache_test::mock_storage::MockStorage;
use shellcache_test::mock_upstream::{MockUpstream, Route};

fn origin() -> Origin {
    "http://localhost:3000".parse().unwrap()
}

fn config(name: &str) -> WorkerConfig {
    WorkerConfig::builder(origin(), name.into())
        .manifest(["/"])
        .build()
}

fn setup() -> (Registration<MockStorage>, MockStorage, MockUpstream) {
    let storage = MockStorage::new();
    let network = MockUpstream::new(origin());
    network.serve("/", "home").serve("/styles.css", "body{}");
    (Registration::new(storage.clone()), storage, network)
}

#[tokio::test]
async fn first_version_is_activated_immediately() {
    let (registration, _storage, mut network) = setup();

    let worker = registration.register(config("v1"), &mut network).await.unwrap();

    assert_eq!(worker.state(), WorkerState::Active);
    let active = registration.active().await.unwrap();
    assert!(Arc::ptr_eq(&active, &worker));
    assert!(registration.waiting().await.is_none());
}

#[tokio::test]
async fn new_version_waits_for_open_pages() {
    let (registration, storage, mut network) = setup();
    let v1 = registration.register(config("v1"), &mut network).await.unwrap();
    registration.client_claimed();
    registration.client_claimed();

    let v2 = registration.register(config("v2"), &mut network).await.unwrap();

    assert_eq!(v2.state(), WorkerState::Waiting);
    assert_eq!(v1.state(), WorkerState::Active);
    assert_eq!(registration.clients(), 2);
    assert_eq!(
        storage.names().await,
        vec![CacheName::new("v1"), CacheName::new("v2")]
    );

    assert_eq!(registration.client_closed().await.unwrap(), None);
    let report = registration.client_closed().await.unwrap().unwrap();

    assert_eq!(report.deleted, vec![CacheName::new("v1")]);
    assert_eq!(v1.state(), WorkerState::Redundant);
    assert_eq!(v2.state(), WorkerState::Active);
    assert_eq!(registration.clients(), 0);
    assert_eq!(storage.names().await, vec![CacheName::new("v2")]);
}

#[tokio::test]
async fn new_version_takes_over_when_no_page_is_open() {
    let (registration, storage, mut network) = setup();
    let v1 = registration.register(config("v1"), &mut network).await.unwrap();
    assert_eq!(registration.clients(), 0);

    let v2 = registration.register(config("v2"), &mut network).await.unwrap();

    assert_eq!(v2.state(), WorkerState::Active);
    assert_eq!(v1.state(), WorkerState::Redundant);
    assert!(registration.waiting().await.is_none());
    let active = registration.active().await.unwrap();
    assert!(Arc::ptr_eq(&active, &v2));
    assert_eq!(storage.names().await, vec![CacheName::new("v2")]);
}

#[tokio::test]
async fn active_version_keeps_serving_while_new_one_waits() {
    let (registration, _storage, mut network) = setup();
    registration.register(config("v1"), &mut network).await.unwrap();
    registration.client_claimed();
    registration.register(config("v2"), &mut network).await.unwrap();
    network.set_offline(true);

    let request = CacheRequest::navigate(origin().resolve("/").unwrap());
    let (result, ctx) = registration.fetch(request, &mut network).await;

    assert!(result.is_ok());
    assert_eq!(ctx.source, ResponseSource::Cache(CacheName::new("v1")));
}

#[tokio::test]
async fn skip_waiting_promotes_now() {
    let (registration, _storage, mut network) = setup();
    registration.register(config("v1"), &mut network).await.unwrap();
    registration.client_claimed();
    let v2 = registration.register(config("v2"), &mut network).await.unwrap();

    let report = registration.skip_waiting().await.unwrap().unwrap();

    assert_eq!(report.current, CacheName::new("v2"));
    assert_eq!(v2.state(), WorkerState::Active);
    assert!(registration.skip_waiting().await.unwrap().is_none());
}

#[tokio::test]
async fn skip_waiting_config_takes_over_on_install() {
    let (registration, _storage, mut network) = setup();
    let v1 = registration.register(config("v1"), &mut network).await.unwrap();
    registration.client_claimed();

    let v2_config = WorkerConfig::builder(origin(), "v2".into())
        .manifest(["/"])
        .skip_waiting(true)
        .build();
    let v2 = registration.register(v2_config, &mut network).await.unwrap();

    assert_eq!(v2.state(), WorkerState::Active);
    assert_eq!(v1.state(), WorkerState::Redundant);
}

#[tokio::test]
async fn newer_waiting_version_replaces_older_one() {
    let (registration, _storage, mut network) = setup();
    registration.register(config("v1"), &mut network).await.unwrap();
    registration.client_claimed();
    let v2 = registration.register(config("v2"), &mut network).await.unwrap();
    let v3 = registration.register(config("v3"), &mut network).await.unwrap();

    assert_eq!(v2.state(), WorkerState::Redundant);
    assert_eq!(v3.state(), WorkerState::Waiting);
    let waiting = registration.waiting().await.unwrap();
    assert_eq!(waiting.cache_name(), &CacheName::new("v3"));
}

#[tokio::test]
async fn failed_install_leaves_registration_untouched() {
    let (registration, _storage, mut network) = setup();
    registration.register(config("v1"), &mut network).await.unwrap();
    network.route("/", Route::new(http::StatusCode::INTERNAL_SERVER_ERROR, "boom"));

    assert!(registration.register(config("v2"), &mut network).await.is_err());

    let active = registration.active().await.unwrap();
    assert_eq!(active.cache_name(), &CacheName::new("v1"));
    assert!(registration.waiting().await.is_none());
}

#[tokio::test]
async fn without_active_version_requests_pass_through() {
    let (registration, _storage, mut network) = setup();
    let request = CacheRequest::get(origin().resolve("/styles.css").unwrap());

    let (class, worker) = registration.route(&request).await;
    assert_eq!(class, RequestClass::Passthrough);
    assert!(worker.is_none());

    let (result, ctx) = registration.fetch(request, &mut network).await;
    assert!(result.is_ok());
    assert_eq!(ctx.class, RequestClass::Passthrough);
}
