// #![warn(missing_docs)]
//! Traits and structs for shellcache storage interaction.
//!
//! A storage is a set of named cache generations ([`CacheStorage`]); each
//! generation is a key/response map ([`Cache`]). If you want to keep caches
//! somewhere other than memory, implement these two traits.
mod entry;
mod error;
pub mod memory;
mod storage;

pub use entry::CacheEntry;
pub use error::BackendError;
pub use memory::{MemoryCache, MemoryStorage};
pub use storage::{BackendResult, Cache, CacheExt, CacheStorage};

/// Status of deleting result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStatus {
    /// Record successfully deleted.
    Deleted(u32),
    /// Record already missing.
    Missing,
}
