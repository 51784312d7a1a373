//! Request classification.

use shellcache_core::{CacheRequest, RequestClass};

use crate::config::WorkerConfig;
use crate::policy::AssetMatch;

/// Decides how `request` is handled under `config`.
///
/// - anything but `GET` is [`RequestClass::Passthrough`]
/// - navigations are [`RequestClass::Navigation`]
/// - allow-listed extensions are [`RequestClass::StaticAsset`]; with
///   [`AssetMatch::ExtensionsOrSameOrigin`] so is every same-origin request
/// - everything else is [`RequestClass::Passthrough`]
///
/// ```
/// use shellcache::{WorkerConfig, classify};
/// use shellcache_core::{CacheRequest, RequestClass};
///
/// let config = WorkerConfig::builder("https://example.com".parse().unwrap(), "v1".into()).build();
/// let asset = CacheRequest::get("https://example.com/app.js".parse().unwrap());
/// let api = CacheRequest::get("https://example.com/api/data".parse().unwrap());
///
/// assert_eq!(classify(&config, &asset), RequestClass::StaticAsset);
/// assert_eq!(classify(&config, &api), RequestClass::Passthrough);
/// ```
pub fn classify(config: &WorkerConfig, request: &CacheRequest) -> RequestClass {
    if !request.is_get() {
        return RequestClass::Passthrough;
    }
    if request.is_navigation() {
        return RequestClass::Navigation;
    }
    if request
        .extension()
        .is_some_and(|extension| config.allows_extension(extension))
    {
        return RequestClass::StaticAsset;
    }
    match config.policy().assets {
        AssetMatch::ExtensionsOrSameOrigin if config.origin().is_same_origin(request.uri()) => {
            RequestClass::StaticAsset
        }
        _ => RequestClass::Passthrough,
    }
}
