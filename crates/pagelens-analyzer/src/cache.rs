//! In-memory TTL cache for fetched pages.
//!
//! Passed explicitly into [`crate::PageFetcher`] so several fetchers (or
//! several concurrent analyses) can share one cache without process-wide
//! state. Entries are immutable `Arc<FetchResult>` values that are replaced,
//! never mutated, so last writer wins for concurrent puts on the same URL.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::types::FetchResult;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Arc<FetchResult>,
    stored_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub total: usize,
    pub expired: usize,
    pub capacity: usize,
}

#[derive(Debug)]
pub struct PageCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
    max_entries: usize,
}

impl PageCache {
    /// Creates a cache holding at most `max_entries` pages for `ttl` each.
    ///
    /// A capacity of zero is bumped to one.
    #[must_use]
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    /// Returns the cached page for `url` if it is still fresh.
    #[must_use]
    pub fn get(&self, url: &str) -> Option<Arc<FetchResult>> {
        self.get_at(url, Instant::now())
    }

    /// Like [`Self::get`] but evaluates freshness against `now`.
    #[must_use]
    pub fn get_at(&self, url: &str, now: Instant) -> Option<Arc<FetchResult>> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(url)?;
        if self.is_expired(entry, now) {
            return None;
        }
        Some(Arc::clone(&entry.value))
    }

    /// Stores `value` for `url`, replacing any previous entry.
    ///
    /// When a new key would exceed capacity, expired entries are dropped first
    /// and then the oldest entries until there is room.
    pub fn put(&self, url: &str, value: Arc<FetchResult>, stored_at: Instant) {
        let Ok(mut entries) = self.entries.write() else {
            return;
        };

        if !entries.contains_key(url) && entries.len() >= self.max_entries {
            let ttl = self.ttl;
            entries.retain(|_, e| stored_at.saturating_duration_since(e.stored_at) <= ttl);
            while entries.len() >= self.max_entries {
                if !Self::evict_oldest(&mut entries) {
                    break;
                }
            }
        }

        entries.insert(url.to_string(), CacheEntry { value, stored_at });
    }

    pub fn remove(&self, url: &str) -> Option<Arc<FetchResult>> {
        let mut entries = self.entries.write().ok()?;
        entries.remove(url).map(|e| e.value)
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |e| e.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let Ok(entries) = self.entries.read() else {
            return CacheStats {
                total: 0,
                expired: 0,
                capacity: self.max_entries,
            };
        };
        CacheStats {
            total: entries.len(),
            expired: entries
                .values()
                .filter(|e| self.is_expired(e, now))
                .count(),
            capacity: self.max_entries,
        }
    }

    fn is_expired(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.stored_at) > self.ttl
    }

    fn evict_oldest(entries: &mut HashMap<String, CacheEntry>) -> bool {
        let oldest = entries
            .iter()
            .min_by_key(|(_, e)| e.stored_at)
            .map(|(k, _)| k.clone());
        match oldest {
            Some(key) => {
                tracing::debug!(url = %key, "evicting oldest cached page");
                entries.remove(&key);
                true
            }
            None => false,
        }
    }
}
