use anyhow::{Error, anyhow};
use cucumber::gherkin::Step;
use cucumber::given;
use http::StatusCode;
use shellcache::PolicyConfig;
use shellcache_backend::CacheStorage;
use shellcache_core::{CacheName, ResponseType};

use crate::mock_upstream::Route;
use crate::world::{OfflineWorld, StepExt};

// =============================================================================
// Network Steps
// =============================================================================

#[given(expr = "the network serves {string} with body {string}")]
fn network_serves(world: &mut OfflineWorld, path: String, body: String) -> Result<(), Error> {
    world.network.serve(&path, body);
    Ok(())
}

#[given(expr = "the network serves {string} as {string} with body {string}")]
fn network_serves_typed(
    world: &mut OfflineWorld,
    path: String,
    content_type: String,
    body: String,
) -> Result<(), Error> {
    let content_type = match content_type.as_str() {
        "html" => "text/html",
        "css" => "text/css",
        "js" => "text/javascript",
        "json" => "application/json",
        other => return Err(anyhow!("unknown content type: {other}")),
    };
    world
        .network
        .route(&path, Route::ok(body).content_type(content_type));
    Ok(())
}

#[given(expr = "the network answers {string} with status {int}")]
fn network_answers_status(world: &mut OfflineWorld, path: String, status: u16) -> Result<(), Error> {
    let status = StatusCode::from_u16(status)?;
    world
        .network
        .route(&path, Route::new(status, status.canonical_reason().unwrap_or_default()));
    Ok(())
}

#[given(expr = "the network serves {string} as an opaque response")]
fn network_serves_opaque(world: &mut OfflineWorld, path: String) -> Result<(), Error> {
    world
        .network
        .route(&path, Route::ok("").kind(ResponseType::Opaque));
    Ok(())
}

#[given(expr = "the network serves {string} after a redirect")]
fn network_serves_redirected(world: &mut OfflineWorld, path: String) -> Result<(), Error> {
    world
        .network
        .route(&path, Route::ok("moved").redirected());
    Ok(())
}

#[given(expr = "the network is offline")]
fn network_offline(world: &mut OfflineWorld) -> Result<(), Error> {
    world.network.set_offline(true);
    Ok(())
}

// =============================================================================
// Configuration Steps
// =============================================================================

#[given(expr = "the manifest lists")]
fn manifest_lists(world: &mut OfflineWorld, step: &Step) -> Result<(), Error> {
    world.manifest = step.docstring_lines();
    Ok(())
}

#[given(expr = "the allowed extensions are {string}")]
fn allowed_extensions(world: &mut OfflineWorld, extensions: String) -> Result<(), Error> {
    world.extensions = Some(
        extensions
            .split(',')
            .map(|extension| extension.trim().to_owned())
            .collect(),
    );
    Ok(())
}

#[given(expr = "the advanced policy")]
fn advanced_policy(world: &mut OfflineWorld) -> Result<(), Error> {
    world.policy = PolicyConfig::advanced();
    Ok(())
}

#[given(expr = "the simple policy with shell {string}")]
fn simple_policy(world: &mut OfflineWorld, shell: String) -> Result<(), Error> {
    world.policy = PolicyConfig::simple(shell);
    Ok(())
}

#[given(expr = "new versions skip waiting")]
fn versions_skip_waiting(world: &mut OfflineWorld) -> Result<(), Error> {
    world.skip_waiting = true;
    Ok(())
}

// =============================================================================
// Storage Steps
// =============================================================================

#[given(expr = "a stale cache {string} exists")]
async fn stale_cache_exists(world: &mut OfflineWorld, name: String) -> Result<(), Error> {
    world.storage.inner.open(&CacheName::new(name)).await?;
    Ok(())
}

#[given(expr = "deleting cache {string} fails")]
fn deleting_cache_fails(world: &mut OfflineWorld, name: String) -> Result<(), Error> {
    world.storage.fail_delete(CacheName::new(name));
    Ok(())
}

#[given(expr = "cache storage is unavailable")]
fn storage_unavailable(world: &mut OfflineWorld) -> Result<(), Error> {
    world.storage.set_unavailable(true);
    Ok(())
}

// =============================================================================
// Registration Steps
// =============================================================================

#[given(expr = "version {string} is active")]
async fn version_active(world: &mut OfflineWorld, name: String) -> Result<(), Error> {
    world.register(&name).await?;
    let active = world
        .registration
        .active()
        .await
        .ok_or_else(|| anyhow!("version {name} was not activated"))?;
    if active.cache_name().as_str() != name {
        return Err(anyhow!(
            "expected {name} to be active, found {}",
            active.cache_name()
        ));
    }
    world.network.reset_calls();
    Ok(())
}

#[given(expr = "{int} page(s) is/are open")]
fn pages_open(world: &mut OfflineWorld, pages: usize) -> Result<(), Error> {
    for _ in 0..pages {
        world.registration.client_claimed();
    }
    Ok(())
}
