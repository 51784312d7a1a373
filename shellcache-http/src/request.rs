//! Conversions between `http` requests and [`CacheRequest`].

use http::header::{ACCEPT, HeaderName};
use http::request::Parts;
use http::{HeaderMap, Request};
use shellcache_core::{CacheRequest, Origin, OriginError, RequestMode};

/// `Sec-Fetch-Mode` request header.
pub const SEC_FETCH_MODE: HeaderName = HeaderName::from_static("sec-fetch-mode");

/// `Sec-Fetch-Dest` request header.
pub const SEC_FETCH_DEST: HeaderName = HeaderName::from_static("sec-fetch-dest");

/// Builds the [`CacheRequest`] the worker sees for an incoming request.
///
/// Relative request targets (`/styles.css`, as servers receive them) are
/// resolved against `origin`; absolute ones are kept. The request mode is
/// read from `Sec-Fetch-Mode`. Without it, a `GET` with `Sec-Fetch-Dest:
/// document` or an `Accept` header listing `text/html` is a navigation and
/// anything else keeps the default mode.
///
/// ```
/// use http::Request;
/// use shellcache_http::cache_request;
///
/// let request = Request::get("/")
///     .header("accept", "text/html,application/xhtml+xml")
///     .body(())
///     .unwrap();
/// let (parts, _) = request.into_parts();
///
/// let request = cache_request(&parts, &"https://example.com".parse().unwrap()).unwrap();
/// assert!(request.is_navigation());
/// assert_eq!(request.uri(), "https://example.com/");
/// ```
pub fn cache_request(parts: &Parts, origin: &Origin) -> Result<CacheRequest, OriginError> {
    let uri = if parts.uri.scheme().is_some() {
        parts.uri.clone()
    } else {
        let target = parts
            .uri
            .path_and_query()
            .map(|path_and_query| path_and_query.as_str())
            .unwrap_or("/");
        origin.resolve(target)?
    };
    let mode = request_mode(&parts.headers).unwrap_or_else(|| {
        if parts.method == http::Method::GET && wants_document(&parts.headers) {
            RequestMode::Navigate
        } else {
            RequestMode::default()
        }
    });
    Ok(CacheRequest::new(parts.method.clone(), uri)
        .with_mode(mode)
        .with_headers(parts.headers.clone()))
}

/// Reads the request mode from `Sec-Fetch-Mode`.
pub fn request_mode(headers: &HeaderMap) -> Option<RequestMode> {
    let value = headers.get(SEC_FETCH_MODE)?.to_str().ok()?;
    match value.trim() {
        "navigate" => Some(RequestMode::Navigate),
        "same-origin" => Some(RequestMode::SameOrigin),
        "no-cors" => Some(RequestMode::NoCors),
        "cors" => Some(RequestMode::Cors),
        _ => None,
    }
}

fn wants_document(headers: &HeaderMap) -> bool {
    if let Some(dest) = headers.get(SEC_FETCH_DEST) {
        return dest.as_bytes() == b"document";
    }
    headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|media| media.split(';').next().map(str::trim) == Some("text/html"))
}

/// Builds the `http` request sent to the network for `request`, with an
/// empty body.
///
/// The URI stays absolute, the request mode is forwarded as
/// `Sec-Fetch-Mode` when the original headers did not carry one.
pub fn into_http_request<B>(request: CacheRequest) -> Request<B>
where
    B: Default,
{
    let (method, uri, mode, mut headers) = request.into_parts();
    if !headers.contains_key(SEC_FETCH_MODE) {
        headers.insert(SEC_FETCH_MODE, http::HeaderValue::from_static(mode.as_str()));
    }
    let mut http_request = Request::new(B::default());
    *http_request.method_mut() = method;
    *http_request.uri_mut() = uri;
    *http_request.headers_mut() = headers;
    http_request
}
