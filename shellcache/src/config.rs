//! Worker configuration.
//!
//! `WorkerConfig` bundles everything one worker version needs: the origin it
//! serves, the name of its cache generation, the manifest preloaded at
//! install, the static asset allow-list and the interception policy.

use shellcache_core::{CacheName, Manifest, Origin};
use smol_str::SmolStr;

use crate::policy::PolicyConfig;

/// Extensions treated as static assets unless configured otherwise.
pub const DEFAULT_EXTENSIONS: &[&str] = &["js", "css", "webp", "png", "jpg", "jpeg", "svg", "woff2"];

/// Configuration of one worker version.
///
/// # Example
///
/// ```
/// use shellcache::{PolicyConfig, WorkerConfig};
///
/// let config = WorkerConfig::builder(
///     "https://example.com".parse().unwrap(),
///     "portfolio-v2".into(),
/// )
/// .manifest(["/", "/index.html", "/manifest.json"])
/// .skip_waiting(true)
/// .policy(PolicyConfig::simple("/index.html"))
/// .build();
///
/// assert_eq!(config.manifest().len(), 3);
/// assert!(config.allows_extension("woff2"));
/// ```
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    origin: Origin,
    cache_name: CacheName,
    manifest: Manifest,
    extensions: Vec<SmolStr>,
    skip_waiting: bool,
    policy: PolicyConfig,
}

impl WorkerConfig {
    /// Creates a builder for the given origin and cache generation.
    pub fn builder(origin: Origin, cache_name: CacheName) -> WorkerConfigBuilder {
        WorkerConfigBuilder::new(origin, cache_name)
    }

    /// Origin the worker serves.
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Name of the current cache generation.
    pub fn cache_name(&self) -> &CacheName {
        &self.cache_name
    }

    /// URLs preloaded at install.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Lowercase static asset extensions.
    pub fn extensions(&self) -> &[SmolStr] {
        &self.extensions
    }

    /// Returns `true` if `extension` is allow-listed. Comparison ignores ASCII case.
    pub fn allows_extension(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(extension))
    }

    /// Whether a freshly installed version takes over without waiting for
    /// controlled pages to close.
    pub fn skip_waiting(&self) -> bool {
        self.skip_waiting
    }

    /// Interception policy.
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }
}

/// Builder for [`WorkerConfig`].
#[derive(Debug, Clone)]
pub struct WorkerConfigBuilder {
    origin: Origin,
    cache_name: CacheName,
    manifest: Manifest,
    extensions: Option<Vec<SmolStr>>,
    skip_waiting: bool,
    policy: PolicyConfig,
}

impl WorkerConfigBuilder {
    fn new(origin: Origin, cache_name: CacheName) -> Self {
        Self {
            origin,
            cache_name,
            manifest: Manifest::default(),
            extensions: None,
            skip_waiting: false,
            policy: PolicyConfig::default(),
        }
    }

    /// Replaces the manifest. Duplicates are dropped, order is kept.
    pub fn manifest<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.manifest = Manifest::new(urls);
        self
    }

    /// Appends one URL to the manifest.
    pub fn precache(mut self, url: impl Into<SmolStr>) -> Self {
        self.manifest.push(url);
        self
    }

    /// Replaces the extension allow-list.
    ///
    /// Extensions are lowercased, a leading dot is stripped and duplicates
    /// are dropped.
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<SmolStr> = Vec::new();
        for extension in extensions {
            let extension = extension.as_ref().trim_start_matches('.').to_ascii_lowercase();
            if !extension.is_empty() && !normalized.iter().any(|known| *known == extension) {
                normalized.push(extension.into());
            }
        }
        self.extensions = Some(normalized);
        self
    }

    /// Sets immediate takeover after install.
    pub fn skip_waiting(mut self, skip_waiting: bool) -> Self {
        self.skip_waiting = skip_waiting;
        self
    }

    /// Sets the interception policy.
    pub fn policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> WorkerConfig {
        let extensions = self.extensions.unwrap_or_else(|| {
            DEFAULT_EXTENSIONS
                .iter()
                .copied()
                .map(SmolStr::new_static)
                .collect()
        });
        WorkerConfig {
            origin: self.origin,
            cache_name: self.cache_name,
            manifest: self.manifest,
            extensions,
            skip_waiting: self.skip_waiting,
            policy: self.policy,
        }
    }
}
