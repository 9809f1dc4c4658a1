//! # namegen
//!
//! 基于大语言模型的名称生成库：多模型回退、请求超时、响应缓存与本地持久化。
//!
//! Name generation on top of an OpenAI-compatible chat-completions API (OpenRouter by
//! default), with multi-model fallback, per-request timeouts, a persistent response
//! cache with rate limiting, and local persistence of settings, favorites and history.
//!
//! ## Overview
//!
//! A caller hands [`NameGenerator::generate`] a [`Settings`] value and receives a list of
//! names or a typed [`Error`]. Behind that call a prompt is built, a priority-ordered list
//! of models is walked with linear backoff between attempts, and the reply is parsed into
//! a bounded list. [`NameStudio`] adds the bookkeeping around a generation (history,
//! favorites, usage counters, export) over a durable key-value store.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use namegen::{NameCategory, NameGenerator, Settings};
//!
//! #[tokio::main]
//! async fn main() -> namegen::Result<()> {
//!     let generator = NameGenerator::builder().build()?;
//!     let settings = Settings::default()
//!         .with_category(NameCategory::Business)
//!         .with_num_names(5);
//!     for name in generator.generate(&settings).await? {
//!         println!("{}", name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Name generator, fallback ladder and completion backends |
//! | [`transport`] | HTTP transport with deadline cancellation |
//! | [`prompt`] | Prompt construction |
//! | [`parser`] | Reply parsing |
//! | [`api`] | Cached, rate-limited JSON requests |
//! | [`cache`] | Persistent TTL response cache |
//! | [`resilience`] | Sliding-window rate limiting |
//! | [`storage`] | Settings, favorites, history and analytics persistence |
//! | [`studio`] | Composition root used by the CLI |
//! | [`config`] | YAML and environment configuration |

pub mod api;
pub mod cache;
pub mod client;
pub mod clock;
pub mod config;
pub mod credentials;
pub mod export;
pub mod pagination;
pub mod parser;
pub mod prompt;
pub mod resilience;
pub mod storage;
pub mod studio;
pub mod transport;
pub mod types;

pub use api::{ApiService, RequestOptions};
pub use client::{GenerationStats, NameGenerator, NameGeneratorBuilder};
pub use config::AppConfig;
pub use export::ExportFormat;
pub use pagination::NamePager;
pub use storage::LocalStore;
pub use studio::NameStudio;
pub use types::{
    Analytics, GeneratedNameSet, HistoryItem, Message, MessageRole, NameCategory, Settings, Theme,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext, ErrorKind};
