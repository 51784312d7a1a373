use anyhow::{Error, anyhow};
use bytes::Bytes;
use cucumber::then;
use shellcache_backend::{Cache, CacheStorage};
use shellcache_core::{CacheName, RequestClass};

use crate::world::OfflineWorld;

// =============================================================================
// Install Steps
// =============================================================================

#[then(expr = "install succeeded")]
fn install_succeeded(world: &mut OfflineWorld) -> Result<(), Error> {
    match &world.install {
        Some(Ok(())) => Ok(()),
        Some(Err(error)) => Err(anyhow!("install failed: {error}")),
        None => Err(anyhow!("no version was registered")),
    }
}

#[then(expr = "install failed")]
fn install_failed(world: &mut OfflineWorld) -> Result<(), Error> {
    match &world.install {
        Some(Err(_)) => Ok(()),
        Some(Ok(())) => Err(anyhow!("install succeeded")),
        None => Err(anyhow!("no version was registered")),
    }
}

// =============================================================================
// Cache Steps
// =============================================================================

#[then(expr = "the cache {string} holds {int} entries")]
async fn cache_holds(world: &mut OfflineWorld, name: String, expected: usize) -> Result<(), Error> {
    let name = CacheName::new(name);
    if !world.storage.inner.has(&name).await? {
        return Err(anyhow!("cache {name} does not exist"));
    }
    let keys = world.storage.inner.open(&name).await?.keys().await?;
    if keys.len() != expected {
        return Err(anyhow!(
            "cache {name} holds {} entries, expected {expected}: {keys:?}",
            keys.len()
        ));
    }
    Ok(())
}

#[then(expr = "the cache {string} has an entry for {string}")]
async fn cache_has_entry(world: &mut OfflineWorld, name: String, path: String) -> Result<(), Error> {
    world
        .cached(&name, &path)
        .await?
        .map(|_| ())
        .ok_or_else(|| anyhow!("cache {name} has no entry for {path}"))
}

#[then(expr = "the cache {string} has no entry for {string}")]
async fn cache_has_no_entry(
    world: &mut OfflineWorld,
    name: String,
    path: String,
) -> Result<(), Error> {
    match world.cached(&name, &path).await? {
        Some(_) => Err(anyhow!("cache {name} has an entry for {path}")),
        None => Ok(()),
    }
}

#[then(expr = "the cache {string} entry for {string} has body {string}")]
async fn cache_entry_body(
    world: &mut OfflineWorld,
    name: String,
    path: String,
    body: String,
) -> Result<(), Error> {
    let response = world
        .cached(&name, &path)
        .await?
        .ok_or_else(|| anyhow!("cache {name} has no entry for {path}"))?;
    if response.body() != &Bytes::from(body.clone()) {
        return Err(anyhow!(
            "cached body {:?} does not match expected {body:?}",
            response.body()
        ));
    }
    Ok(())
}

#[then(expr = "the caches are {string}")]
async fn caches_are(world: &mut OfflineWorld, expected: String) -> Result<(), Error> {
    let expected: Vec<&str> = expected.split(',').map(str::trim).collect();
    let names = world.storage.names().await;
    let actual: Vec<&str> = names.iter().map(CacheName::as_str).collect();
    if actual != expected {
        return Err(anyhow!("caches are {actual:?}, expected {expected:?}"));
    }
    Ok(())
}

#[then(expr = "cache {string} was not deleted")]
async fn cache_not_deleted(world: &mut OfflineWorld, name: String) -> Result<(), Error> {
    if world.storage.inner.has(&CacheName::new(name.clone())).await? {
        Ok(())
    } else {
        Err(anyhow!("cache {name} was deleted"))
    }
}

// =============================================================================
// Fetch Steps
// =============================================================================

#[then(expr = "the response status is {int}")]
fn response_status(world: &mut OfflineWorld, status: u16) -> Result<(), Error> {
    let actual = world.response()?.status().as_u16();
    if actual != status {
        return Err(anyhow!(
            "Response status {actual} does not match expected {status}"
        ));
    }
    Ok(())
}

#[then(expr = "the response body is {string}")]
fn response_body(world: &mut OfflineWorld, body: String) -> Result<(), Error> {
    let actual = world.response()?.body();
    if actual != &Bytes::from(body.clone()) {
        return Err(anyhow!(
            "Response body {actual:?} does not match expected {body:?}"
        ));
    }
    Ok(())
}

#[then(expr = "the response source is {string}")]
fn response_source(world: &mut OfflineWorld, source: String) -> Result<(), Error> {
    let actual = world.context()?.source.as_str();
    if actual != source {
        return Err(anyhow!(
            "Response source {actual} does not match expected {source}"
        ));
    }
    Ok(())
}

#[then(expr = "the response was stored")]
fn response_stored(world: &mut OfflineWorld) -> Result<(), Error> {
    if world.context()?.stored {
        Ok(())
    } else {
        Err(anyhow!("response was not stored"))
    }
}

#[then(expr = "the response was not stored")]
fn response_not_stored(world: &mut OfflineWorld) -> Result<(), Error> {
    if world.context()?.stored {
        Err(anyhow!("response was stored"))
    } else {
        Ok(())
    }
}

#[then(expr = "the request was passed through")]
fn request_passed_through(world: &mut OfflineWorld) -> Result<(), Error> {
    let class = world.context()?.class;
    if class != RequestClass::Passthrough {
        return Err(anyhow!("request was handled as {class}"));
    }
    Ok(())
}

#[then(expr = "the request was handled as {string}")]
fn request_handled_as(world: &mut OfflineWorld, class: String) -> Result<(), Error> {
    let actual = world.context()?.class;
    if actual.as_str() != class {
        return Err(anyhow!("request was handled as {actual}, expected {class}"));
    }
    Ok(())
}

#[then(expr = "the fetch failed")]
fn fetch_failed(world: &mut OfflineWorld) -> Result<(), Error> {
    match (&world.fetch.error, &world.fetch.response) {
        (Some(_), None) => Ok(()),
        _ => Err(anyhow!("fetch returned a response")),
    }
}

#[then(expr = "the network was called {int} time(s) for {string}")]
fn network_called(world: &mut OfflineWorld, expected: usize, path: String) -> Result<(), Error> {
    let calls = world.network.calls(&path);
    if calls != expected {
        return Err(anyhow!(
            "network was called {calls} times for {path}, expected {expected}"
        ));
    }
    Ok(())
}

// =============================================================================
// Registration Steps
// =============================================================================

#[then(expr = "the active version is {string}")]
async fn active_version(world: &mut OfflineWorld, name: String) -> Result<(), Error> {
    let active = world
        .registration
        .active()
        .await
        .ok_or_else(|| anyhow!("no version is active"))?;
    if active.cache_name().as_str() != name {
        return Err(anyhow!("active version is {}", active.cache_name()));
    }
    Ok(())
}

#[then(expr = "there is no active version")]
async fn no_active_version(world: &mut OfflineWorld) -> Result<(), Error> {
    match world.registration.active().await {
        Some(active) => Err(anyhow!("version {} is active", active.cache_name())),
        None => Ok(()),
    }
}

#[then(expr = "version {string} is waiting")]
async fn version_waiting(world: &mut OfflineWorld, name: String) -> Result<(), Error> {
    let waiting = world
        .registration
        .waiting()
        .await
        .ok_or_else(|| anyhow!("no version is waiting"))?;
    if waiting.cache_name().as_str() != name {
        return Err(anyhow!("waiting version is {}", waiting.cache_name()));
    }
    Ok(())
}

#[then(expr = "no version is waiting")]
async fn no_version_waiting(world: &mut OfflineWorld) -> Result<(), Error> {
    match world.registration.waiting().await {
        Some(waiting) => Err(anyhow!("version {} is waiting", waiting.cache_name())),
        None => Ok(()),
    }
}

#[then(expr = "the activation deleted {string}")]
fn activation_deleted(world: &mut OfflineWorld, name: String) -> Result<(), Error> {
    let report = world
        .activation
        .as_ref()
        .ok_or_else(|| anyhow!("no activation happened"))?;
    if !report.deleted.iter().any(|deleted| deleted.as_str() == name) {
        return Err(anyhow!("activation deleted {:?}", report.deleted));
    }
    Ok(())
}

#[then(expr = "no activation happened")]
fn no_activation(world: &mut OfflineWorld) -> Result<(), Error> {
    match &world.activation {
        Some(report) => Err(anyhow!("{} was activated", report.current)),
        None => Ok(()),
    }
}
