//! Route resolution caching.
//!
//! [`ResolutionCache`] remembers which registered route a pathname resolved
//! to, so repeated navigations (popstate resyncs, forced reloads, link
//! clicks to the same screen) skip the pattern scan. It is gated behind the
//! `cache` feature flag and uses the [`lru`] crate internally.
//!
//! Misses are cached too: a pathname no route accepts maps to `None`.
//! The router clears the cache whenever a route is registered, since a new
//! route can change what any path resolves to.
//!
//! # Examples
//!
//! ```
//! use club_navigator::cache::ResolutionCache;
//!
//! let mut cache = ResolutionCache::new();
//! cache.insert("/events".to_string(), Some(2));
//!
//! assert_eq!(cache.get("/events"), Some(Some(2)));
//! assert_eq!(cache.get("/other"), None);
//! assert_eq!(cache.stats().hits, 1);
//! assert_eq!(cache.stats().misses, 1);
//! ```

use crate::{debug_log, trace_log};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Counters tracking cache hit/miss rates and invalidations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: usize,
    /// Lookups that had to scan the registry.
    pub misses: usize,
    /// Number of full cache invalidations (via [`ResolutionCache::clear`]).
    pub invalidations: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU map from pathname to the index of the route it resolved to.
///
/// Default capacity is 256 entries.
#[derive(Debug)]
pub struct ResolutionCache {
    entries: LruCache<String, Option<usize>>,
    stats: CacheStats,
}

impl ResolutionCache {
    const DEFAULT_CAPACITY: usize = 256;

    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache with a custom capacity. Zero is bumped to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Look up the cached resolution for `pathname`.
    ///
    /// `None` is a cache miss; `Some(None)` is a cached routing miss.
    pub fn get(&mut self, pathname: &str) -> Option<Option<usize>> {
        if let Some(entry) = self.entries.get(pathname) {
            self.stats.hits += 1;
            trace_log!("Resolution cache hit for '{}'", pathname);
            Some(*entry)
        } else {
            self.stats.misses += 1;
            trace_log!("Resolution cache miss for '{}'", pathname);
            None
        }
    }

    /// Remember what `pathname` resolved to.
    pub fn insert(&mut self, pathname: String, route_index: Option<usize>) {
        self.entries.push(pathname, route_index);
    }

    /// Drop every entry and increment the invalidation counter.
    pub fn clear(&mut self) {
        let removed = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += 1;
        debug_log!(
            "Resolution cache cleared: {} entries removed \
             ({} total invalidations, hit rate: {:.1}%)",
            removed,
            self.stats.invalidations,
            self.stats.hit_rate() * 100.0
        );
    }

    /// Return a reference to the current cache statistics.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Number of cached pathnames.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new()
    }
}
