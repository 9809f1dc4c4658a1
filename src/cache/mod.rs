//! 响应缓存模块：按 `method:url:body` 缓存请求结果，并持久化到本地存储。
//!
//! # Response Caching Module
//!
//! Request-level caching for [`crate::api::ApiService`]. Entries live for a fixed TTL
//! (five minutes by default) and the whole map is mirrored to the `apiCache` blob, so a
//! restart keeps warm entries.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ResponseCache`] | TTL map with lazy sweeping, persistence and statistics |
//! | [`CacheConfig`] | TTL, enable flag and storage key |
//! | [`CacheKey`] | `method:url:body` composite key |
//! | [`CacheEntry`] | Persisted `{data, timestamp}` record |
//!
//! ## Example
//!
//! ```rust
//! use namegen::cache::{CacheConfig, CacheKey, ResponseCache};
//! use namegen::clock::system_clock;
//! use namegen::storage::MemoryStore;
//! use std::sync::Arc;
//!
//! let cache = ResponseCache::load(CacheConfig::default(), Arc::new(MemoryStore::new()), system_clock());
//! let key = CacheKey::for_request("GET", "https://api.example.com/v1/models", None);
//! cache.insert(&key, serde_json::json!({"data": []}));
//! assert!(cache.get(&key).is_some());
//! ```

mod key;
mod manager;

pub use key::CacheKey;
pub use manager::{CacheConfig, CacheEntry, CacheStats, ResponseCache};
