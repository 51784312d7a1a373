//! Response snapshots.
//!
//! A [`Response`] is a fully buffered response: status, headers, body and
//! the fetch response type. Responses are **read-once**: the type does not
//! implement `Clone`, and anything that needs to hand one response to two
//! consumers (the caller and the cache) must call [`Response::duplicate`]
//! at the point of receipt. The body is a [`Bytes`] handle, so duplicating
//! never copies body data.
//!
//! ## Cacheability
//!
//! Only a successful, same-origin, non-redirected response is eligible for
//! caching:
//!
//! | Check | Requirement |
//! |-------|-------------|
//! | status | exactly `200` |
//! | type | [`ResponseType::Basic`] |
//! | redirected | `false` |
//!
//! Error statuses, CORS and opaque cross-origin responses are returned to the
//! caller as-is and never stored.

use std::fmt;

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, StatusCode, Uri, header::HeaderName};
use serde::{Deserialize, Serialize};

/// Type of a response, mirroring the fetch response types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseType {
    /// Same-origin response with full access to headers and body.
    #[default]
    Basic,
    /// Valid cross-origin CORS response.
    Cors,
    /// Response that does not come from a network fetch.
    Default,
    /// Network error placeholder.
    Error,
    /// Cross-origin `no-cors` response; status and body are hidden.
    Opaque,
    /// Redirect captured with `redirect: manual`.
    OpaqueRedirect,
}

impl ResponseType {
    /// Returns the type as a label.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Basic => "basic",
            ResponseType::Cors => "cors",
            ResponseType::Default => "default",
            ResponseType::Error => "error",
            ResponseType::Opaque => "opaque",
            ResponseType::OpaqueRedirect => "opaqueredirect",
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A buffered response.
///
/// # Example
///
/// ```
/// use http::StatusCode;
/// use shellcache_core::{Response, ResponseType};
///
/// let response = Response::new(StatusCode::OK, "body { margin: 0 }");
/// assert!(response.is_cacheable());
///
/// let copy = response.duplicate();
/// assert_eq!(copy.body(), response.body());
///
/// let opaque = Response::new(StatusCode::OK, "").with_type(ResponseType::Opaque);
/// assert!(!opaque.is_cacheable());
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    kind: ResponseType,
    url: Option<Uri>,
    redirected: bool,
}

impl Response {
    /// Creates a basic response with the given status and body.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
            kind: ResponseType::Basic,
            url: None,
            redirected: false,
        }
    }

    /// Creates a `200 OK` basic response.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// Sets the response type.
    pub fn with_type(mut self, kind: ResponseType) -> Self {
        self.kind = kind;
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

    /// Records the final URL the response was fetched from.
    pub fn with_url(mut self, url: Uri) -> Self {
        self.url = Some(url);
        self
    }

    /// Marks the response as the result of following a redirect.
    pub fn with_redirected(mut self, redirected: bool) -> Self {
        self.redirected = redirected;
        self
    }

    /// Returns the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a mutable reference to the headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Returns the body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the response type.
    pub fn kind(&self) -> ResponseType {
        self.kind
    }

    /// Returns the final URL, if known.
    pub fn url(&self) -> Option<&Uri> {
        self.url.as_ref()
    }

    /// Returns `true` if the response followed a redirect.
    pub fn redirected(&self) -> bool {
        self.redirected
    }

    /// Returns `true` for `2xx` statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns `true` if the response may be written to the cache.
    pub fn is_cacheable(&self) -> bool {
        self.status == StatusCode::OK && self.kind == ResponseType::Basic && !self.redirected
    }

    /// Produces an independent copy of this response.
    ///
    /// The body handle is shared, the headers are copied.
    pub fn duplicate(&self) -> Self {
        Self {
            status: self.status,
            headers: self.headers.clone(),
            body: self.body.clone(),
            kind: self.kind,
            url: self.url.clone(),
            redirected: self.redirected,
        }
    }

    /// Consumes the response and returns its body.
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Consumes the response and returns status, headers and body.
    pub fn into_parts(self) -> (StatusCode, HeaderMap, Bytes) {
        (self.status, self.headers, self.body)
    }
}
