//! 本地存储模块：设置、收藏、历史记录与使用计数的持久化。
//!
//! # Local Storage Module
//!
//! Durable key-value persistence. Each key holds one JSON document that is replaced
//! whole on every write.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`KeyValueStore`] | Trait for blob backends |
//! | [`FileStore`] | One JSON file per key, atomic replace |
//! | [`MemoryStore`] | In-process backend for tests and ephemeral runs |
//! | [`LocalStore`] | Typed settings/favorites/history/analytics accessors |

mod kv;
mod local;

pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use local::{LocalStore, DEFAULT_MAX_HISTORY};

/// Storage keys shared with other components.
pub mod keys {
    pub const SETTINGS: &str = "settings";
    pub const FAVORITES: &str = "favorites";
    pub const HISTORY: &str = "history";
    pub const ANALYTICS: &str = "name_analytics";
    pub const API_CACHE: &str = "apiCache";
}
