//! Stored cache entries.

use std::mem::size_of;

use chrono::{DateTime, Utc};
use shellcache_core::{CacheKey, Response};

/// An immutable snapshot stored under a [`CacheKey`].
///
/// Entries are never mutated: updating a key means writing a new entry,
/// which replaces the old one as a whole. Readers receive a
/// [`duplicate`](Response::duplicate) of the stored response, so handing an
/// entry out never consumes it.
#[derive(Debug)]
pub struct CacheEntry {
    key: CacheKey,
    response: Response,
    stored_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(key: CacheKey, response: Response) -> Self {
        Self::with_timestamp(key, response, Utc::now())
    }

    /// Creates an entry with an explicit timestamp.
    pub fn with_timestamp(key: CacheKey, response: Response, stored_at: DateTime<Utc>) -> Self {
        Self {
            key,
            response,
            stored_at,
        }
    }

    /// Returns the key.
    #[inline]
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Returns the stored response.
    #[inline]
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Returns when the entry was written.
    #[inline]
    pub fn stored_at(&self) -> DateTime<Utc> {
        self.stored_at
    }

    /// Returns a fresh copy of the stored response for a caller.
    pub fn to_response(&self) -> Response {
        self.response.duplicate()
    }

    /// Estimated memory usage of this entry in bytes.
    pub fn memory_size(&self) -> usize {
        size_of::<Self>() + self.key.memory_size() + self.response.body().len()
    }
}
