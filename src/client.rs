//! 名称生成客户端：多模型回退、重试与退避。
//!
//! Name generation client. The retry/fallback bookkeeping lives in [`policy`]; the
//! network seam is [`CompletionBackend`].

pub mod backend;
pub mod builder;
pub mod core;
pub mod policy;
pub mod types;

pub use backend::{CompletionBackend, OpenRouterBackend};
pub use builder::NameGeneratorBuilder;
pub use core::NameGenerator;
pub use policy::{Attempt, FallbackLadder, Outcome, Transition};
pub use types::GenerationStats;
