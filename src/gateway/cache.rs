//! Short-lived language detection cache.
//!
//! Identical text posted in quick succession (reposts, command retries)
//! skips a provider round-trip. Eviction is strictly insertion-ordered:
//! when full, the oldest-inserted entry goes first, regardless of how
//! recently it was read.

use polyglot_core::{config::CacheConfig, filter};
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

pub struct DetectionCache {
    ttl: Duration,
    capacity: usize,
    entries: HashMap<String, (String, Instant)>,
    insertion_order: VecDeque<String>,
}

impl DetectionCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            ttl: Duration::from_secs(config.ttl_secs),
            capacity: config.capacity.max(1),
            entries: HashMap::new(),
            insertion_order: VecDeque::new(),
        }
    }

    /// Look up the detected language for `text`. Expired entries are removed
    /// on read and count as a miss.
    pub fn get(&mut self, text: &str) -> Option<String> {
        let key = filter::normalize(text);
        match self.entries.get(&key) {
            Some((code, inserted_at)) if inserted_at.elapsed() < self.ttl => Some(code.clone()),
            Some(_) => {
                self.entries.remove(&key);
                self.insertion_order.retain(|k| k != &key);
                None
            }
            None => None,
        }
    }

    /// Record a detection result, evicting the oldest-inserted entry when at
    /// capacity.
    pub fn put(&mut self, text: &str, code: &str) {
        let key = filter::normalize(text);
        if self.entries.contains_key(&key) {
            self.entries.insert(key, (code.to_string(), Instant::now()));
            return;
        }
        while self.entries.len() >= self.capacity {
            match self.insertion_order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        self.entries.insert(key.clone(), (code.to_string(), Instant::now()));
        self.insertion_order.push_back(key);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(ttl_secs: u64, capacity: usize) -> DetectionCache {
        DetectionCache::new(&CacheConfig { ttl_secs, capacity })
    }

    #[test]
    fn test_put_get_normalizes_key() {
        let mut c = cache(60, 500);
        c.put("Hello   World", "en");
        assert_eq!(c.get("hello world").as_deref(), Some("en"));
        assert_eq!(c.get("  HELLO WORLD  ").as_deref(), Some("en"));
        assert_eq!(c.get("hello worlds"), None);
    }

    #[test]
    fn test_evicts_oldest_inserted_first() {
        let mut c = cache(60, 500);
        for i in 0..500 {
            c.put(&format!("message {i}"), "en");
        }
        assert_eq!(c.len(), 500);

        // Reading the oldest entry must not save it from eviction.
        assert!(c.get("message 0").is_some());
        c.put("message 500", "tr");

        assert_eq!(c.len(), 500);
        assert!(c.get("message 0").is_none(), "oldest entry evicted");
        assert!(c.get("message 1").is_some());
        assert_eq!(c.get("message 500").as_deref(), Some("tr"));
    }

    #[test]
    fn test_expired_entry_misses_and_is_removed() {
        let mut c = cache(0, 500);
        c.put("stale", "en");
        assert_eq!(c.get("stale"), None);
        assert_eq!(c.len(), 0);
    }

    #[test]
    fn test_overwrite_refreshes_without_duplicating() {
        let mut c = cache(60, 2);
        c.put("a", "en");
        c.put("a", "tr");
        c.put("b", "en");
        assert_eq!(c.len(), 2);
        assert_eq!(c.get("a").as_deref(), Some("tr"));

        c.put("c", "de");
        assert!(c.get("a").is_none(), "'a' is still the oldest insertion");
        assert!(c.get("b").is_some());
        assert!(c.get("c").is_some());
    }
}
