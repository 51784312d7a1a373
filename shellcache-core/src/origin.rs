//! Origin of the controlled site.
//!
//! An [`Origin`] is the `scheme://authority` pair the worker is registered
//! against. It is used to:
//!
//! - resolve root-relative manifest paths (`/index.html`) into absolute URIs
//! - decide whether a request or response is same-origin
//!
//! ```
//! use shellcache_core::Origin;
//!
//! let origin: Origin = "https://example.com".parse().unwrap();
//! let uri = origin.resolve("/index.html").unwrap();
//! assert_eq!(uri.to_string(), "https://example.com/index.html");
//! assert!(origin.is_same_origin(&uri));
//! ```

use std::fmt;
use std::str::FromStr;

use http::Uri;
use http::uri::{Authority, PathAndQuery, Scheme};
use thiserror::Error;

/// Errors produced while parsing an origin or resolving a path against it.
#[derive(Debug, Error)]
pub enum OriginError {
    /// The input is not a valid URI.
    #[error("invalid uri: {0}")]
    InvalidUri(#[from] http::uri::InvalidUri),
    /// The URI parts could not be assembled into a URI.
    #[error("invalid uri parts: {0}")]
    InvalidParts(#[from] http::uri::InvalidUriParts),
    /// The URI has no scheme or no authority.
    #[error("origin must be absolute (scheme://host), got `{0}`")]
    NotAbsolute(String),
    /// The path cannot be resolved against an origin.
    #[error("path must be root-relative or absolute, got `{0}`")]
    NotRootRelative(String),
}

/// Scheme and authority of a site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin {
    scheme: Scheme,
    authority: Authority,
}

impl Origin {
    /// Creates an origin from its parts.
    pub fn new(scheme: Scheme, authority: Authority) -> Self {
        Self { scheme, authority }
    }

    /// Extracts the origin of an absolute URI.
    ///
    /// Returns `None` for relative URIs.
    pub fn from_uri(uri: &Uri) -> Option<Self> {
        match (uri.scheme(), uri.authority()) {
            (Some(scheme), Some(authority)) => Some(Self {
                scheme: scheme.clone(),
                authority: authority.clone(),
            }),
            _ => None,
        }
    }

    /// Returns the scheme.
    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    /// Returns the authority (`host[:port]`).
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Returns `true` if `uri` is absolute and shares this origin.
    ///
    /// Hosts compare case-insensitively and an explicit default port equals
    /// an omitted one, so `https://example.com:443` is the same origin as
    /// `https://example.com`.
    pub fn is_same_origin(&self, uri: &Uri) -> bool {
        let (Some(scheme), Some(authority)) = (uri.scheme(), uri.authority()) else {
            return false;
        };
        *scheme == self.scheme
            && authority.host().eq_ignore_ascii_case(self.authority.host())
            && effective_port(scheme, authority) == effective_port(&self.scheme, &self.authority)
    }

    /// Resolves a root-relative path (or an absolute URI) against this origin.
    ///
    /// Absolute URIs are returned unchanged, so manifests may list
    /// cross-origin URLs as well.
    pub fn resolve(&self, path: &str) -> Result<Uri, OriginError> {
        if !path.starts_with('/') {
            return match path.parse::<Uri>() {
                Ok(uri) if uri.scheme().is_some() => Ok(uri),
                _ => Err(OriginError::NotRootRelative(path.to_owned())),
            };
        }
        let uri: Uri = path.parse()?;
        let path_and_query = uri
            .path_and_query()
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/"));
        let uri = Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
            .map_err(|_| OriginError::NotRootRelative(path.to_owned()))?;
        Ok(uri)
    }
}

fn effective_port(scheme: &Scheme, authority: &Authority) -> Option<u16> {
    authority.port_u16().or_else(|| {
        if *scheme == Scheme::HTTPS {
            Some(443)
        } else if *scheme == Scheme::HTTP {
            Some(80)
        } else {
            None
        }
    })
}

impl FromStr for Origin {
    type Err = OriginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uri: Uri = s.parse()?;
        Origin::from_uri(&uri).ok_or_else(|| OriginError::NotAbsolute(s.to_owned()))
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority)
    }
}
