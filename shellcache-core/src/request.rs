//! Intercepted request types.
//!
//! A [`CacheRequest`] is what the worker sees for every request the
//! controlled page issues: method, absolute URI, request mode and headers.
//! Requests carry no body; only `GET` requests are ever answered from cache,
//! everything else is passed through untouched.
//!
//! [`RequestClass`] is the derived classification used to pick a strategy.
//! It is never stored, it is recomputed for every request.

use std::fmt;

use http::{HeaderMap, HeaderValue, Method, Uri, header::HeaderName};
use serde::{Deserialize, Serialize};

use crate::origin::Origin;

/// Mode of a request, mirroring the fetch request modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    /// Top-level page load or reload.
    Navigate,
    /// Sub-resource restricted to the page's origin.
    SameOrigin,
    /// Cross-origin request without CORS; the response is opaque.
    NoCors,
    /// Regular sub-resource request.
    #[default]
    Cors,
}

impl RequestMode {
    /// Returns the mode as it appears in `Sec-Fetch-Mode`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            RequestMode::Navigate => "navigate",
            RequestMode::SameOrigin => "same-origin",
            RequestMode::NoCors => "no-cors",
            RequestMode::Cors => "cors",
        }
    }
}

impl fmt::Display for RequestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an intercepted request is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestClass {
    /// Page load. Served network-first in the default policy.
    Navigation,
    /// Script, style, image or font. Served cache-first.
    StaticAsset,
    /// Anything else. Default networking applies.
    Passthrough,
}

impl RequestClass {
    /// Returns the class as a label for logs and metrics.
    pub const fn as_str(&self) -> &'static str {
        match self {
            RequestClass::Navigation => "navigation",
            RequestClass::StaticAsset => "static-asset",
            RequestClass::Passthrough => "passthrough",
        }
    }

    /// Returns `true` unless the class is [`RequestClass::Passthrough`].
    pub const fn is_intercepted(&self) -> bool {
        !matches!(self, RequestClass::Passthrough)
    }
}

impl fmt::Display for RequestClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request issued by the controlled page.
///
/// # Example
///
/// ```
/// use shellcache_core::{CacheRequest, RequestMode};
///
/// let request = CacheRequest::get("https://example.com/assets/app.js".parse().unwrap());
/// assert_eq!(request.extension(), Some("js"));
/// assert_eq!(request.mode(), RequestMode::Cors);
///
/// let page = CacheRequest::navigate("https://example.com/".parse().unwrap());
/// assert!(page.is_navigation());
/// assert_eq!(page.extension(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRequest {
    method: Method,
    uri: Uri,
    mode: RequestMode,
    headers: HeaderMap,
}

impl CacheRequest {
    /// Creates a request with the given method and URI in `cors` mode.
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            mode: RequestMode::default(),
            headers: HeaderMap::new(),
        }
    }

    /// Creates a `GET` sub-resource request.
    pub fn get(uri: Uri) -> Self {
        Self::new(Method::GET, uri)
    }

    /// Creates a `GET` navigation request.
    pub fn navigate(uri: Uri) -> Self {
        Self::new(Method::GET, uri).with_mode(RequestMode::Navigate)
    }

    /// Sets the request mode.
    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    /// Adds a header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Replaces all headers.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Returns the method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the URI.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the request mode.
    pub fn mode(&self) -> RequestMode {
        self.mode
    }

    /// Returns the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns `true` for `GET` requests.
    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }

    /// Returns `true` for page loads.
    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }

    /// Returns the origin of the request URI, if it is absolute.
    pub fn origin(&self) -> Option<Origin> {
        Origin::from_uri(&self.uri)
    }

    /// Returns the extension of the last path segment, as written.
    ///
    /// `/app.min.js` yields `js`, `/` and `/about` yield `None`.
    pub fn extension(&self) -> Option<&str> {
        let segment = self.uri.path().rsplit('/').next()?;
        let (stem, extension) = segment.rsplit_once('.')?;
        if stem.is_empty() || extension.is_empty() {
            return None;
        }
        Some(extension)
    }

    /// Consumes the request and returns its parts.
    pub fn into_parts(self) -> (Method, Uri, RequestMode, HeaderMap) {
        (self.method, self.uri, self.mode, self.headers)
    }
}
