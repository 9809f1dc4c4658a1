//! 弹性模式模块：按端点的滑动窗口限流。
//!
//! # Resilience Primitives Module
//!
//! Outbound request throttling for [`crate::api::ApiService`].
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`rate_limiter`] | Sliding-window limiter with exponential backoff |
//!
//! Requests beyond the per-endpoint budget are delayed, not rejected:
//!
//! ```rust
//! use namegen::clock::system_clock;
//! use namegen::resilience::rate_limiter::{RateLimiter, RateLimiterConfig};
//!
//! let limiter = RateLimiter::new(RateLimiterConfig::new().with_max_requests(5), system_clock());
//! assert!(limiter.record("https://api.example.com/v1/models").is_none());
//! ```

pub mod rate_limiter;
