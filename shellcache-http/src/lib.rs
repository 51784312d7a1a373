//! HTTP integration for shellcache.
//!
//! Converts incoming [`http::Request`] parts into the
//! [`CacheRequest`](shellcache_core::CacheRequest) the worker classifies,
//! buffers network [`http::Response`]s into cacheable snapshots and turns
//! snapshots back into responses with a [`ShellBody`].
pub mod body;
pub mod cache_status;
mod request;
mod response;

pub use body::ShellBody;
pub use cache_status::{CacheStatusExt, DEFAULT_CACHE_STATUS_HEADER};
pub use request::{SEC_FETCH_DEST, SEC_FETCH_MODE, cache_request, into_http_request, request_mode};
pub use response::{collect_response, into_http_response, response_type};
