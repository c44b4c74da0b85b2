//! Explicit caching of fetched pages
//!
//! Some views memoize list responses keyed by their query parameters.
//! Rather than a module-level map, that memoization is an explicit
//! object the view owns, with explicit invalidation: the coordinator
//! never consults a cache on its own, so a cached page is only ever as
//! stale as its owner allows.

use crate::core::page::PageRequest;
use crate::filter::FilterGroup;
use indexmap::IndexMap;

/// A cached page: the rows of one window plus the total at fetch time
#[derive(Debug, Clone, PartialEq)]
pub struct CachedPage<T> {
    pub rows: Vec<T>,
    pub count: u64,
}

/// Bounded, insertion-ordered page cache
///
/// When full, inserting a new key evicts the oldest entry. Re-inserting
/// an existing key replaces its page in place.
#[derive(Debug)]
pub struct PageCache<T> {
    entries: IndexMap<String, CachedPage<T>>,
    capacity: usize,
}

impl<T> PageCache<T> {
    /// Create a cache holding at most `capacity` pages
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: IndexMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Look up a cached page
    pub fn get(&self, key: &str) -> Option<&CachedPage<T>> {
        self.entries.get(key)
    }

    /// Store a page, evicting the oldest entry when at capacity
    pub fn insert(&mut self, key: String, page: CachedPage<T>) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
        }
        self.entries.insert(key, page);
    }

    /// Drop one entry; returns whether it was present
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.shift_remove(key).is_some()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Stable cache key for a request and the filter it was issued under
pub fn cache_key(request: &PageRequest, filter: Option<&FilterGroup>) -> String {
    serde_json::json!({
        "request": request,
        "filter": filter,
    })
    .to_string()
}
