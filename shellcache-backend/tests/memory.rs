//! Tests for the in-memory storage through the request-level API.

use bytes::Bytes;
use http::{StatusCode, Uri};
use shellcache_backend::{Cache, CacheExt, CacheStorage, DeleteStatus, MemoryStorage};
use shellcache_core::{CacheKey, CacheName, CacheRequest, Response};

fn request(path: &str) -> CacheRequest {
    let uri: Uri = format!("https://example.com{path}").parse().unwrap();
    CacheRequest::get(uri)
}

#[tokio::test]
async fn put_then_match_returns_a_copy() {
    let storage = MemoryStorage::new();
    let cache = storage.open(&CacheName::new("v1")).await.unwrap();

    cache
        .put(&request("/styles.css"), Response::ok("body{}"))
        .await
        .unwrap();

    let first = cache.match_request(&request("/styles.css")).await.unwrap();
    let second = cache.match_request(&request("/styles.css")).await.unwrap();

    assert_eq!(first.unwrap().into_body(), Bytes::from_static(b"body{}"));
    assert_eq!(second.unwrap().into_body(), Bytes::from_static(b"body{}"));
}

#[tokio::test]
async fn miss_returns_none() {
    let storage = MemoryStorage::new();
    let cache = storage.open(&CacheName::new("v1")).await.unwrap();
    assert!(cache.match_request(&request("/app.js")).await.unwrap().is_none());
}

#[tokio::test]
async fn put_overwrites_same_key() {
    let storage = MemoryStorage::new();
    let cache = storage.open(&CacheName::new("v1")).await.unwrap();

    cache.put(&request("/"), Response::ok("old")).await.unwrap();
    cache.put(&request("/"), Response::ok("new")).await.unwrap();

    assert_eq!(cache.len().await, 1);
    let stored = cache.match_request(&request("/")).await.unwrap().unwrap();
    assert_eq!(stored.into_body(), Bytes::from_static(b"new"));
}

#[tokio::test]
async fn put_all_is_visible_as_a_whole() {
    let storage = MemoryStorage::new();
    let cache = storage.open(&CacheName::new("v1")).await.unwrap();

    cache
        .put_all(vec![
            (request("/"), Response::ok("root")),
            (request("/index.html"), Response::ok("index")),
            (request("/manifest.json"), Response::ok("{}")),
        ])
        .await
        .unwrap();

    let keys: Vec<String> = cache
        .keys()
        .await
        .unwrap()
        .iter()
        .map(|key| key.url().to_owned())
        .collect();
    assert_eq!(
        keys,
        [
            "https://example.com/",
            "https://example.com/index.html",
            "https://example.com/manifest.json",
        ]
    );
}

#[tokio::test]
async fn repeated_put_all_does_not_duplicate() {
    let storage = MemoryStorage::new();
    let cache = storage.open(&CacheName::new("v1")).await.unwrap();

    for _ in 0..3 {
        cache
            .put_all(vec![
                (request("/"), Response::ok("root")),
                (request("/index.html"), Response::ok("index")),
            ])
            .await
            .unwrap();
    }

    assert_eq!(cache.len().await, 2);
}

#[tokio::test]
async fn caches_are_isolated_by_name() {
    let storage = MemoryStorage::new();
    let v1 = storage.open(&CacheName::new("v1")).await.unwrap();
    let v2 = storage.open(&CacheName::new("v2")).await.unwrap();

    v1.put(&request("/"), Response::ok("v1")).await.unwrap();

    assert!(v2.match_request(&request("/")).await.unwrap().is_none());
}

#[tokio::test]
async fn reopened_handle_sees_previous_writes() {
    let storage = MemoryStorage::new();
    let name = CacheName::new("v1");
    storage
        .open(&name)
        .await
        .unwrap()
        .put(&request("/"), Response::ok("root"))
        .await
        .unwrap();

    let reopened = storage.open(&name).await.unwrap();
    assert!(reopened.match_request(&request("/")).await.unwrap().is_some());
}

#[tokio::test]
async fn remove_entry() {
    let storage = MemoryStorage::new();
    let cache = storage.open(&CacheName::new("v1")).await.unwrap();
    cache.put(&request("/"), Response::ok("root")).await.unwrap();

    let key = CacheKey::from_request(&request("/"));
    assert_eq!(cache.remove(&key).await.unwrap(), DeleteStatus::Deleted(1));
    assert_eq!(cache.remove(&key).await.unwrap(), DeleteStatus::Missing);
}

#[tokio::test]
async fn stored_status_and_headers_survive() {
    let storage = MemoryStorage::new();
    let cache = storage.open(&CacheName::new("v1")).await.unwrap();
    let response = Response::new(StatusCode::OK, "x").with_header(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("text/css"),
    );
    cache.put(&request("/a.css"), response).await.unwrap();

    let stored = cache.match_request(&request("/a.css")).await.unwrap().unwrap();
    assert_eq!(stored.status(), StatusCode::OK);
    assert_eq!(stored.headers()[http::header::CONTENT_TYPE], "text/css");
}

#[tokio::test]
async fn concurrent_writes_to_same_key_leave_one_entry() {
    let storage = MemoryStorage::new();
    let cache = storage.open(&CacheName::new("v1")).await.unwrap();

    let writes = (0..16).map(|i| {
        let cache = cache.clone();
        async move {
            cache
                .put(&request("/race.js"), Response::ok(format!("{i}")))
                .await
                .unwrap()
        }
    });
    futures::future::join_all(writes).await;

    assert_eq!(cache.len().await, 1);
}
