//! Conversions between `http` responses and the buffered [`Response`].

use http_body::Body as HttpBody;
use http_body_util::BodyExt;
use shellcache_core::{CacheRequest, Origin, RequestMode, Response, ResponseType};

use crate::body::ShellBody;

/// Response type a browser would assign to a response for `request`.
///
/// Same-origin responses are `basic`. Cross-origin ones are `opaque` when
/// requested in `no-cors` mode and `cors` otherwise.
pub fn response_type(origin: &Origin, request: &CacheRequest) -> ResponseType {
    if origin.is_same_origin(request.uri()) {
        ResponseType::Basic
    } else if request.mode() == RequestMode::NoCors {
        ResponseType::Opaque
    } else {
        ResponseType::Cors
    }
}

/// Reads a network response to the end and snapshots it.
///
/// The snapshot records the request URL and the response type derived by
/// [`response_type`].
pub async fn collect_response<B>(
    response: http::Response<B>,
    request: &CacheRequest,
    origin: &Origin,
) -> Result<Response, B::Error>
where
    B: HttpBody,
{
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await?.to_bytes();
    Ok(Response::new(parts.status, bytes)
        .with_headers(parts.headers)
        .with_type(response_type(origin, request))
        .with_url(request.uri().clone()))
}

/// Turns a snapshot back into an `http` response with a buffered body.
pub fn into_http_response<B>(response: Response) -> http::Response<ShellBody<B>> {
    let (status, headers, body) = response.into_parts();
    let mut http_response = http::Response::new(ShellBody::complete(body));
    *http_response.status_mut() = status;
    *http_response.headers_mut() = headers;
    http_response
}
