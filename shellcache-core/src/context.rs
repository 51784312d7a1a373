//! Per-request context describing how a fetch was answered.

use std::fmt;

use crate::generation::CacheName;
use crate::request::RequestClass;

/// Where the returned response came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResponseSource {
    /// Live network response.
    #[default]
    Network,
    /// Stored entry for the exact request, from the named generation.
    Cache(CacheName),
    /// Cached application shell served in place of a failed navigation.
    OfflineShell(CacheName),
}

impl ResponseSource {
    /// Returns the source as a label for headers, logs and metrics.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ResponseSource::Network => "network",
            ResponseSource::Cache(_) => "cache",
            ResponseSource::OfflineShell(_) => "offline-shell",
        }
    }

    /// Returns `true` if the response was read from a cache generation.
    #[inline]
    pub fn is_cached(&self) -> bool {
        !matches!(self, ResponseSource::Network)
    }
}

impl fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome metadata of one intercepted fetch.
///
/// Created when a request is intercepted and updated by the strategy as it
/// runs. Returned next to the response so callers (the tower layer, metrics)
/// can report what happened without inspecting the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchContext {
    /// Classification the strategy was chosen from.
    pub class: RequestClass,
    /// Where the response came from.
    pub source: ResponseSource,
    /// Whether a copy of the response was written to the cache.
    pub stored: bool,
    /// Whether the network was contacted.
    pub network_attempted: bool,
}

impl FetchContext {
    /// Creates an empty context for a request of the given class.
    pub fn new(class: RequestClass) -> Self {
        Self {
            class,
            source: ResponseSource::Network,
            stored: false,
            network_attempted: false,
        }
    }
}
