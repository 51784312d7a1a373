use shellcache_core::OriginError;
use smol_str::SmolStr;
use thiserror::Error;

/// Errors produced while reading or validating a worker configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid yaml: {0}")]
    Yaml(#[from] serde_saphyr::Error),

    #[error("invalid origin `{origin}`: {source}")]
    InvalidOrigin {
        origin: SmolStr,
        #[source]
        source: OriginError,
    },

    #[error("cache name must not be empty")]
    EmptyCacheName,

    #[error("manifest entry `{url}` is neither root-relative nor absolute")]
    InvalidManifestUrl {
        url: SmolStr,
        #[source]
        source: OriginError,
    },

    #[error("extension `{0}` is not a plain file extension")]
    InvalidExtension(SmolStr),

    #[error("offline fallback `{0}` is not listed in the manifest")]
    FallbackNotPrecached(SmolStr),
}
