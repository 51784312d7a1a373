//! Cache key type.
//!
//! Entries are keyed by request method and absolute URL. In practice only
//! `GET` requests are ever stored, but the method stays part of the key so a
//! `HEAD` or `POST` can never alias a stored `GET`.
//!
//! ```
//! use shellcache_core::{CacheKey, CacheRequest};
//!
//! let request = CacheRequest::get("https://example.com/styles.css".parse().unwrap());
//! let key = CacheKey::from_request(&request);
//! assert_eq!(key.to_string(), "GET https://example.com/styles.css");
//! ```

use std::fmt;

use http::{Method, Uri};
use smol_str::SmolStr;

use crate::request::CacheRequest;

/// Key identifying a cache entry.
///
/// Cloning is cheap: the URL is a [`SmolStr`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    method: Method,
    url: SmolStr,
}

impl CacheKey {
    /// Creates a key from a method and URI.
    pub fn new(method: Method, uri: &Uri) -> Self {
        Self {
            method,
            url: SmolStr::new(uri.to_string()),
        }
    }

    /// Creates a `GET` key for a URI.
    pub fn get(uri: &Uri) -> Self {
        Self::new(Method::GET, uri)
    }

    /// Creates the key an intercepted request is stored and matched under.
    pub fn from_request(request: &CacheRequest) -> Self {
        Self::new(request.method().clone(), request.uri())
    }

    /// Returns the method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the absolute URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Estimated heap and inline size of this key in bytes.
    pub fn memory_size(&self) -> usize {
        std::mem::size_of::<Self>() + self.url.len()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestMode;

    #[test]
    fn navigation_and_subresource_share_key() {
        let uri: Uri = "https://example.com/".parse().unwrap();
        let page = CacheRequest::navigate(uri.clone());
        let fetch = CacheRequest::get(uri).with_mode(RequestMode::SameOrigin);
        assert_eq!(CacheKey::from_request(&page), CacheKey::from_request(&fetch));
    }

    #[test]
    fn method_is_part_of_key() {
        let uri: Uri = "https://example.com/api/data".parse().unwrap();
        assert_ne!(CacheKey::get(&uri), CacheKey::new(Method::POST, &uri));
    }

    #[test]
    fn query_is_part_of_key() {
        let a: Uri = "https://example.com/app.js?v=1".parse().unwrap();
        let b: Uri = "https://example.com/app.js?v=2".parse().unwrap();
        assert_ne!(CacheKey::get(&a), CacheKey::get(&b));
    }
}
