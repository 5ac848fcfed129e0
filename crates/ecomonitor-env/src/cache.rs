//! Bounded LRU cache of place-search results keyed by normalized query.
//!
//! Owned by the screen's event loop; no internal synchronization.

use std::collections::{HashMap, VecDeque};

use crate::types::PlaceSuggestion;

/// Default number of cached queries
pub const DEFAULT_CAPACITY: usize = 16;

#[derive(Debug)]
pub struct SuggestionCache {
    capacity: usize,
    entries: HashMap<String, Vec<PlaceSuggestion>>,
    /// Keys from least to most recently used
    recency: VecDeque<String>,
}

impl Default for SuggestionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SuggestionCache {
    /// A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            recency: VecDeque::with_capacity(capacity),
        }
    }

    /// Look up a key, marking it most recently used on a hit.
    pub fn get(&mut self, key: &str) -> Option<&[PlaceSuggestion]> {
        if !self.entries.contains_key(key) {
            return None;
        }
        self.touch(key);
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Insert or replace a key, evicting the least recently used entry when full.
    pub fn put(&mut self, key: String, value: Vec<PlaceSuggestion>) {
        if self.entries.contains_key(&key) {
            self.touch(&key);
            self.entries.insert(key, value);
            return;
        }

        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.recency.pop_front() {
                tracing::debug!("Evicting cached suggestions for {:?}", oldest);
                self.entries.remove(&oldest);
            }
        }

        self.recency.push_back(key.clone());
        self.entries.insert(key, value);
    }

    /// Presence check that does not count as a use
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.recency.iter().position(|k| k == key) {
            if let Some(k) = self.recency.remove(pos) {
                self.recency.push_back(k);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    fn suggestions(name: &str) -> Vec<PlaceSuggestion> {
        vec![PlaceSuggestion {
            name: Some(name.to_string()),
            ..Default::default()
        }]
    }

    #[test]
    fn test_get_miss_and_hit() {
        let mut cache = SuggestionCache::default();
        assert!(cache.get("cur").is_none());
        cache.put("cur".into(), suggestions("Curitiba"));
        let hit = cache.get("cur").unwrap();
        assert_eq!(hit[0].name.as_deref(), Some("Curitiba"));
    }

    #[test]
    fn test_seventeen_inserts_evict_first() {
        let mut cache = SuggestionCache::new(16);
        for i in 0..17 {
            cache.put(format!("key{i}"), suggestions(&i.to_string()));
        }
        assert_eq!(cache.len(), 16);
        assert!(cache.get("key0").is_none());
        for i in 1..17 {
            assert!(cache.get(&format!("key{i}")).is_some(), "key{i} should remain");
        }
    }

    #[test]
    fn test_get_refreshes_recency() {
        let mut cache = SuggestionCache::new(16);
        for i in 0..16 {
            cache.put(format!("key{i}"), suggestions(&i.to_string()));
        }
        // key0 becomes most recent, so key1 is now the eviction candidate
        assert!(cache.get("key0").is_some());
        cache.put("key16".into(), suggestions("16"));
        assert!(cache.contains("key0"));
        assert!(!cache.contains("key1"));
    }

    #[test]
    fn test_put_existing_replaces_and_refreshes() {
        let mut cache = SuggestionCache::new(2);
        cache.put("a".into(), suggestions("old"));
        cache.put("b".into(), suggestions("b"));
        cache.put("a".into(), suggestions("new"));
        cache.put("c".into(), suggestions("c"));
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains("b"));
        assert_eq!(cache.get("a").unwrap()[0].name.as_deref(), Some("new"));
    }

    #[test]
    fn test_empty_lists_are_cached() {
        let mut cache = SuggestionCache::default();
        cache.put("zzzq".into(), Vec::new());
        assert_eq!(cache.get("zzzq").map(<[_]>::len), Some(0));
    }

    #[test]
    fn test_contains_does_not_touch() {
        let mut cache = SuggestionCache::new(2);
        cache.put("a".into(), suggestions("a"));
        cache.put("b".into(), suggestions("b"));
        assert!(cache.contains("a"));
        cache.put("c".into(), suggestions("c"));
        assert!(!cache.contains("a"));
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut cache = SuggestionCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.put("a".into(), suggestions("a"));
        cache.put("b".into(), suggestions("b"));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
