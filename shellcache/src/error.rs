use shellcache_backend::BackendError;
use shellcache_core::{NetworkError, OriginError};
use thiserror::Error;

use crate::fsm::InvalidTransition;

/// Install could not populate the cache generation.
///
/// Any variant leaves the worker [`Redundant`](crate::fsm::WorkerState::Redundant)
/// with nothing written.
#[derive(Debug, Error)]
pub enum InstallError {
    /// A manifest entry is not a valid URL for the worker's origin.
    #[error("invalid manifest entry `{url}`: {source}")]
    InvalidUrl {
        /// Entry as written in the manifest.
        url: String,
        /// Resolution error.
        #[source]
        source: OriginError,
    },
    /// A manifest URL could not be fetched.
    #[error("failed to fetch manifest entry: {0}")]
    Fetch(#[source] NetworkError),
    /// A manifest URL answered with a non-success status.
    #[error("manifest entry {url} answered with status {status}")]
    BadStatus {
        /// Absolute URL that was fetched.
        url: String,
        /// Status returned.
        status: u16,
    },
    /// The storage refused to open the cache or to write the batch.
    #[error("cache storage failed during install: {0}")]
    Storage(#[from] BackendError),
}

/// An intercepted fetch could not produce a response.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The network failed and the request has no cached answer.
    #[error(transparent)]
    Network(#[from] NetworkError),
    /// A navigation failed on the network and neither its own cache entry
    /// nor the offline shell was available.
    #[error("offline and no cached page for {url}")]
    NoFallback {
        /// Absolute URL of the navigation.
        url: String,
        /// Network failure that triggered the fallback.
        #[source]
        source: NetworkError,
    },
}

impl FetchError {
    /// Returns the underlying network error.
    pub fn network(&self) -> &NetworkError {
        match self {
            FetchError::Network(source) | FetchError::NoFallback { source, .. } => source,
        }
    }
}

/// Error type for worker and registration operations.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Install failed; the version is redundant.
    #[error(transparent)]
    Install(#[from] InstallError),
    /// A lifecycle event arrived out of order.
    #[error(transparent)]
    Transition(#[from] InvalidTransition),
    /// Storage error outside of install.
    #[error(transparent)]
    Storage(#[from] BackendError),
}
