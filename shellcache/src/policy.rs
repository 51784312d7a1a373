use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Which `GET` requests count as static assets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Default)]
pub enum AssetMatch {
    /// Only URLs whose last path segment ends in an allow-listed extension.
    #[default]
    Extensions,
    /// Allow-listed extensions, plus every request to the worker's own origin.
    ExtensionsOrSameOrigin,
}

/// How navigation requests are served.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Default)]
pub enum NavigationStrategy {
    /// Try the network, store a copy, fall back to the cached page when offline.
    #[default]
    NetworkFirst,
    /// Serve the cached page when present, otherwise go to the network.
    CacheFirst,
}

/// Interception policy.
///
/// Two presets exist: [`PolicyConfig::advanced`] (network-first pages,
/// extension-matched assets, no shell fallback) and [`PolicyConfig::simple`]
/// (everything same-origin is cache-first, navigations fall back to the
/// cached shell document).
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Default)]
pub struct PolicyConfig {
    /// Static asset matching rule.
    #[serde(default)]
    pub assets: AssetMatch,
    /// Navigation strategy.
    #[serde(default)]
    pub navigation: NavigationStrategy,
    /// Root-relative URL of the document served to navigations that can be
    /// answered neither by the network nor by their own cache entry.
    #[serde(default)]
    pub offline_fallback: Option<SmolStr>,
}

impl PolicyConfig {
    /// Network-first navigations, cache-first allow-listed assets.
    pub fn advanced() -> Self {
        Self::default()
    }

    /// Cache-first for allow-listed assets and any same-origin request,
    /// with `shell` served to navigations when offline.
    pub fn simple(shell: impl Into<SmolStr>) -> Self {
        Self {
            assets: AssetMatch::ExtensionsOrSameOrigin,
            navigation: NavigationStrategy::CacheFirst,
            offline_fallback: Some(shell.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advanced_is_default() {
        assert_eq!(PolicyConfig::advanced(), PolicyConfig::default());
        assert_eq!(PolicyConfig::advanced().offline_fallback, None);
    }

    #[test]
    fn simple_uses_shell() {
        let policy = PolicyConfig::simple("/index.html");
        assert_eq!(policy.assets, AssetMatch::ExtensionsOrSameOrigin);
        assert_eq!(policy.navigation, NavigationStrategy::CacheFirst);
        assert_eq!(policy.offline_fallback.as_deref(), Some("/index.html"));
    }
}
