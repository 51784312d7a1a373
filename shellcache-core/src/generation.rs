//! Cache generation names.
//!
//! Every deployment that changes the asset set ships a new [`CacheName`]
//! (e.g. `portfolio-v1.1` → `portfolio-v1.2`). The name is opaque: the only
//! operation that matters is equality, which is what activation uses to tell
//! the current generation from stale ones.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Name of one cache generation.
///
/// ```
/// use shellcache_core::CacheName;
///
/// let current = CacheName::new("portfolio-v2");
/// assert_eq!(current.as_str(), "portfolio-v2");
/// assert_ne!(current, CacheName::new_static("portfolio-v1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheName(SmolStr);

impl CacheName {
    /// Creates a cache name.
    #[inline]
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self(name.into())
    }

    /// Creates a cache name from a static string (no allocation).
    #[inline]
    pub const fn new_static(name: &'static str) -> Self {
        Self(SmolStr::new_static(name))
    }

    /// Returns the name as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the empty name.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CacheName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Borrow<str> for CacheName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CacheName {
    #[inline]
    fn from(s: &str) -> Self {
        Self(SmolStr::new(s))
    }
}

impl From<String> for CacheName {
    #[inline]
    fn from(s: String) -> Self {
        Self(SmolStr::from(s))
    }
}
