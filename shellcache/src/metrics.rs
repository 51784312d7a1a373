//! Metrics declaration and initialization.

use shellcache_core::FetchContext;

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
lazy_static! {
    // Fetch handling

    /// Track number of intercepted fetches per class and response source.
    pub static ref FETCH_COUNTER: &'static str = {
        metrics::describe_counter!(
            "shellcache_fetch_total",
            "Total number of fetches handled by the worker."
        );
        "shellcache_fetch_total"
    };
    /// Track number of fetches that failed without a fallback.
    pub static ref FETCH_ERROR_COUNTER: &'static str = {
        metrics::describe_counter!(
            "shellcache_fetch_errors_total",
            "Total number of fetches that could not be answered."
        );
        "shellcache_fetch_errors_total"
    };
    /// Track number of responses written back to the cache.
    pub static ref CACHE_WRITE_COUNTER: &'static str = {
        metrics::describe_counter!(
            "shellcache_cache_writes_total",
            "Total number of responses stored during fetch handling."
        );
        "shellcache_cache_writes_total"
    };

    // Lifecycle

    /// Track number of installs per outcome.
    pub static ref INSTALL_COUNTER: &'static str = {
        metrics::describe_counter!(
            "shellcache_install_total",
            "Total number of worker installs."
        );
        "shellcache_install_total"
    };
    /// Track number of stale cache generations deleted on activate.
    pub static ref GENERATIONS_DELETED_COUNTER: &'static str = {
        metrics::describe_counter!(
            "shellcache_generations_deleted_total",
            "Total number of stale cache generations deleted."
        );
        "shellcache_generations_deleted_total"
    };
}

/// Record one handled fetch.
///
/// When the `metrics` feature is disabled, this function is a no-op
/// and will be eliminated by the compiler.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_fetch(ctx: &FetchContext, failed: bool) {
    let class = ctx.class.as_str();
    let source = ctx.source.as_str();

    metrics::counter!(*FETCH_COUNTER, "class" => class, "source" => source).increment(1);
    if failed {
        metrics::counter!(*FETCH_ERROR_COUNTER, "class" => class).increment(1);
    }
    if ctx.stored {
        metrics::counter!(*CACHE_WRITE_COUNTER, "class" => class).increment(1);
    }
}

/// No-op version when metrics feature is disabled.
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_fetch(_ctx: &FetchContext, _failed: bool) {}

/// Record an install outcome (`"installed"` or `"failed"`).
#[cfg(feature = "metrics")]
#[inline]
pub fn record_install(outcome: &'static str) {
    metrics::counter!(*INSTALL_COUNTER, "outcome" => outcome).increment(1);
}

/// No-op version when metrics feature is disabled.
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_install(_outcome: &'static str) {}

/// Record generations deleted by one activation.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_generations_deleted(count: usize) {
    metrics::counter!(*GENERATIONS_DELETED_COUNTER).increment(count as u64);
}

/// No-op version when metrics feature is disabled.
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_generations_deleted(_count: usize) {}
