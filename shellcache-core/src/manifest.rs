//! Cache manifest: the application shell preloaded at install time.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Ordered, de-duplicated list of URLs that must be cached before a worker
/// version may become active.
///
/// Entries are kept as written (usually root-relative paths) and resolved
/// against the worker's origin when install runs.
///
/// ```
/// use shellcache_core::Manifest;
///
/// let manifest = Manifest::new(["/", "/index.html", "/", "/manifest.json"]);
/// assert_eq!(manifest.len(), 3);
/// assert_eq!(manifest.iter().collect::<Vec<_>>(), ["/", "/index.html", "/manifest.json"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SmolStr>", into = "Vec<SmolStr>")]
pub struct Manifest {
    urls: Vec<SmolStr>,
}

impl Manifest {
    /// Creates a manifest, dropping repeated URLs but keeping first-seen order.
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        let mut manifest = Self::default();
        for url in urls {
            manifest.push(url);
        }
        manifest
    }

    /// Appends a URL unless it is already listed.
    ///
    /// Returns `false` if the URL was a duplicate.
    pub fn push(&mut self, url: impl Into<SmolStr>) -> bool {
        let url = url.into();
        if self.contains(&url) {
            return false;
        }
        self.urls.push(url);
        true
    }

    /// Returns `true` if the URL is listed.
    pub fn contains(&self, url: &str) -> bool {
        self.urls.iter().any(|listed| listed == url)
    }

    /// Iterates over the URLs in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> {
        self.urls.iter().map(SmolStr::as_str)
    }

    /// Number of URLs.
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Returns `true` when nothing is listed.
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl From<Vec<SmolStr>> for Manifest {
    fn from(urls: Vec<SmolStr>) -> Self {
        Manifest::new(urls)
    }
}

impl From<Manifest> for Vec<SmolStr> {
    fn from(manifest: Manifest) -> Self {
        manifest.urls
    }
}

impl<S: Into<SmolStr>> FromIterator<S> for Manifest {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Manifest::new(iter)
    }
}
