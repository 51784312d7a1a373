use anyhow::Error;
use cucumber::when;
use http::Method;
use shellcache_core::CacheRequest;

use crate::world::OfflineWorld;

#[when(expr = "version {string} is registered")]
async fn version_registered(world: &mut OfflineWorld, name: String) -> Result<(), Error> {
    // Failures are kept on the world for the `install` assertions.
    let _ = world.register(&name).await;
    Ok(())
}

#[when(expr = "the page requests {string}")]
async fn page_requests(world: &mut OfflineWorld, path: String) -> Result<(), Error> {
    let request = world.request(&path)?;
    world.fetch(request).await;
    Ok(())
}

#[when(expr = "the page navigates to {string}")]
async fn page_navigates(world: &mut OfflineWorld, path: String) -> Result<(), Error> {
    let request = CacheRequest::navigate(world.origin.resolve(&path)?);
    world.fetch(request).await;
    Ok(())
}

#[when(expr = "the page posts to {string}")]
async fn page_posts(world: &mut OfflineWorld, path: String) -> Result<(), Error> {
    let request = CacheRequest::new(Method::POST, world.origin.resolve(&path)?);
    world.fetch(request).await;
    Ok(())
}

#[when(expr = "the network goes offline")]
fn network_goes_offline(world: &mut OfflineWorld) -> Result<(), Error> {
    world.network.set_offline(true);
    Ok(())
}

#[when(expr = "the network comes back")]
fn network_comes_back(world: &mut OfflineWorld) -> Result<(), Error> {
    world.network.set_offline(false);
    Ok(())
}

#[when(expr = "the waiting version skips waiting")]
async fn waiting_skips(world: &mut OfflineWorld) -> Result<(), Error> {
    world.activation = world.registration.skip_waiting().await?;
    Ok(())
}

#[when(expr = "a page closes")]
async fn page_closes(world: &mut OfflineWorld) -> Result<(), Error> {
    world.activation = world.registration.client_closed().await?;
    Ok(())
}
