//! Persistent response cache.

use super::key::CacheKey;
use crate::clock::Clock;
use crate::storage::{keys, KeyValueStore};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: serde_json::Value,
    /// Milliseconds since the Unix epoch when the entry was stored.
    pub timestamp: u64,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub enabled: bool,
    pub storage_key: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            enabled: true,
            storage_key: keys::API_CACHE.to_string(),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub evictions: u64,
    pub errors: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    evictions: AtomicU64,
    errors: AtomicU64,
}

impl AtomicStats {
    fn to_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// TTL cache whose whole map is mirrored to one durable blob after every change.
///
/// Expiry is lazy: entries are only dropped by [`ResponseCache::sweep`], which callers
/// run before each request. There is no background timer.
pub struct ResponseCache {
    config: CacheConfig,
    entries: Mutex<HashMap<String, CacheEntry>>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    stats: AtomicStats,
}

impl ResponseCache {
    /// Load the persisted map. Unreadable or corrupt data is logged and ignored.
    pub fn load(config: CacheConfig, store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        let entries = match store.get(&config.storage_key) {
            Ok(Some(raw)) => match serde_json::from_str::<HashMap<String, CacheEntry>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    warn!(error = %e, key = config.storage_key.as_str(), "ignoring corrupt persisted cache");
                    HashMap::new()
                }
            },
            Ok(None) => HashMap::new(),
            Err(e) => {
                warn!(error = %e, key = config.storage_key.as_str(), "failed to load persisted cache");
                HashMap::new()
            }
        };
        debug!(entries = entries.len(), backend = store.name(), "response cache loaded");
        Self {
            config,
            entries: Mutex::new(entries),
            store,
            clock,
            stats: AtomicStats::default(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_fresh(&self, entry: &CacheEntry, now: u64) -> bool {
        (now.saturating_sub(entry.timestamp) as u128) < self.config.ttl.as_millis()
    }

    fn persist(&self, entries: &HashMap<String, CacheEntry>) {
        let result = serde_json::to_string(entries)
            .map_err(crate::Error::from)
            .and_then(|raw| self.store.set(&self.config.storage_key, &raw));
        if let Err(e) = result {
            self.stats.errors.fetch_add(1, Ordering::Relaxed);
            warn!(error = %e, "failed to persist response cache");
        }
    }

    /// Drop expired entries and persist if anything was removed. Returns the number removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now_ms();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, e| self.is_fresh(e, now));
        let removed = before - entries.len();
        if removed > 0 {
            self.stats
                .evictions
                .fetch_add(removed as u64, Ordering::Relaxed);
            self.persist(&entries);
            debug!(removed, remaining = entries.len(), "swept expired cache entries");
        }
        removed
    }

    pub fn get(&self, key: &CacheKey) -> Option<serde_json::Value> {
        if !self.config.enabled {
            return None;
        }
        let now = self.clock.now_ms();
        let entries = self.lock();
        match entries.get(key.as_str()) {
            Some(entry) if self.is_fresh(entry, now) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.data.clone())
            }
            _ => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn get_as<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let value = self.get(key)?;
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(_) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn insert(&self, key: &CacheKey, data: serde_json::Value) {
        if !self.config.enabled {
            return;
        }
        let entry = CacheEntry {
            data,
            timestamp: self.clock.now_ms(),
        };
        let mut entries = self.lock();
        entries.insert(key.as_str().to_string(), entry);
        self.stats.sets.fetch_add(1, Ordering::Relaxed);
        self.persist(&entries);
    }

    /// Remove `key` and persist the result. Returns whether an entry existed.
    pub fn evict(&self, key: &CacheKey) -> bool {
        let mut entries = self.lock();
        let existed = entries.remove(key.as_str()).is_some();
        if existed {
            self.stats.evictions.fetch_add(1, Ordering::Relaxed);
        }
        self.persist(&entries);
        existed
    }

    pub fn clear(&self) {
        let mut entries = self.lock();
        entries.clear();
        self.persist(&entries);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.to_stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn setup() -> (Arc<MemoryStore>, Arc<ManualClock>, ResponseCache) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(10_000));
        let cache = ResponseCache::load(CacheConfig::default(), store.clone(), clock.clone());
        (store, clock, cache)
    }

    #[test]
    fn test_hit_within_ttl_miss_after() {
        let (_, clock, cache) = setup();
        let key = CacheKey::for_request("GET", "https://x/a", None);
        cache.insert(&key, json!({"ok": true}));
        assert_eq!(cache.get(&key), Some(json!({"ok": true})));

        clock.advance(Duration::from_secs(299));
        assert!(cache.get(&key).is_some());
        clock.advance(Duration::from_secs(1));
        assert!(cache.get(&key).is_none());

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_sweep_removes_and_persists() {
        let (store, clock, cache) = setup();
        cache.insert(&"old".into(), json!(1));
        clock.advance(Duration::from_secs(200));
        cache.insert(&"new".into(), json!(2));
        clock.advance(Duration::from_secs(120));

        assert_eq!(cache.sweep(), 1);
        assert_eq!(cache.len(), 1);
        let raw = store.get(keys::API_CACHE).unwrap().unwrap();
        let persisted: HashMap<String, CacheEntry> = serde_json::from_str(&raw).unwrap();
        assert!(persisted.contains_key("new"));
        assert!(!persisted.contains_key("old"));
        assert_eq!(cache.sweep(), 0);
    }

    #[test]
    fn test_survives_reload() {
        let (store, clock, cache) = setup();
        let key = CacheKey::for_request("GET", "https://x/b", None);
        cache.insert(&key, json!(["a", "b"]));
        drop(cache);

        let reloaded = ResponseCache::load(CacheConfig::default(), store, clock);
        assert_eq!(reloaded.get(&key), Some(json!(["a", "b"])));
    }

    #[test]
    fn test_corrupt_persisted_cache_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::API_CACHE, "{{{").unwrap();
        let cache = ResponseCache::load(
            CacheConfig::default(),
            store,
            Arc::new(ManualClock::new(0)),
        );
        assert!(cache.is_empty());
    }

    #[test]
    fn test_evict_and_disabled() {
        let (_, _, cache) = setup();
        let key: CacheKey = "k".into();
        cache.insert(&key, json!(1));
        assert!(cache.evict(&key));
        assert!(!cache.evict(&key));

        let disabled = ResponseCache::load(
            CacheConfig::new().with_enabled(false),
            Arc::new(MemoryStore::new()),
            Arc::new(ManualClock::new(0)),
        );
        disabled.insert(&key, json!(1));
        assert!(disabled.get(&key).is_none());
    }

    #[test]
    fn test_get_as_typed() {
        let (_, _, cache) = setup();
        let key: CacheKey = "typed".into();
        cache.insert(&key, json!(["x", "y"]));
        let v: Vec<String> = cache.get_as(&key).unwrap();
        assert_eq!(v, vec!["x", "y"]);
        assert!(cache.get_as::<u32>(&key).is_none());
    }
}
