use serde::{Deserialize, Serialize};
use shellcache::{PolicyConfig, WorkerConfig};
use shellcache_core::{CacheName, Origin};
use smol_str::SmolStr;

use crate::error::ConfigError;

/// Declarative form of a [`WorkerConfig`].
///
/// ```yaml
/// origin: "https://portfolio.example"
/// cache_name: portfolio-v2
/// manifest:
///   - /
///   - /index.html
/// extensions: [js, css, png]
/// skip_waiting: false
/// policy:
///   assets: ExtensionsOrSameOrigin
///   navigation: CacheFirst
///   offline_fallback: /index.html
/// ```
///
/// `extensions` falls back to [`shellcache::DEFAULT_EXTENSIONS`] when absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigWorker {
    pub origin: SmolStr,
    pub cache_name: SmolStr,
    #[serde(default)]
    pub manifest: Vec<SmolStr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<SmolStr>>,
    #[serde(default)]
    pub skip_waiting: bool,
    #[serde(default)]
    pub policy: PolicyConfig,
}

impl ConfigWorker {
    /// Parses a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_saphyr::from_str(yaml)?)
    }

    /// Validates the values and builds the worker configuration.
    pub fn into_config(self) -> Result<WorkerConfig, ConfigError> {
        let origin: Origin = self
            .origin
            .parse()
            .map_err(|source| ConfigError::InvalidOrigin {
                origin: self.origin.clone(),
                source,
            })?;

        let cache_name = self.cache_name.trim();
        if cache_name.is_empty() {
            return Err(ConfigError::EmptyCacheName);
        }

        for url in &self.manifest {
            origin
                .resolve(url)
                .map_err(|source| ConfigError::InvalidManifestUrl {
                    url: url.clone(),
                    source,
                })?;
        }

        if let Some(shell) = &self.policy.offline_fallback
            && !self.manifest.contains(shell)
        {
            return Err(ConfigError::FallbackNotPrecached(shell.clone()));
        }

        let mut builder = WorkerConfig::builder(origin, CacheName::new(cache_name))
            .manifest(self.manifest)
            .skip_waiting(self.skip_waiting)
            .policy(self.policy);

        if let Some(extensions) = self.extensions {
            if let Some(invalid) = extensions.iter().find(|extension| !is_plain_extension(extension)) {
                return Err(ConfigError::InvalidExtension(invalid.clone()));
            }
            builder = builder.extensions(extensions);
        }

        Ok(builder.build())
    }
}

impl TryFrom<ConfigWorker> for WorkerConfig {
    type Error = ConfigError;

    fn try_from(config: ConfigWorker) -> Result<Self, Self::Error> {
        config.into_config()
    }
}

fn is_plain_extension(extension: &str) -> bool {
    let extension = extension.strip_prefix('.').unwrap_or(extension);
    !extension.is_empty() && extension.chars().all(|c| c.is_ascii_alphanumeric())
}
