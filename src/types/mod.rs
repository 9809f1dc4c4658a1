//! 类型模块：设置、历史记录、生成结果与聊天请求的数据类型。
//!
//! # Types Module
//!
//! Strongly typed representations of everything that crosses a boundary: settings
//! persisted by the caller, history and analytics blobs, generated name sets, and the
//! chat-completion wire format.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`settings`] | [`Settings`], [`NameCategory`], [`Theme`] |
//! | [`history`] | [`HistoryItem`] and [`Analytics`] counters |
//! | [`names`] | [`GeneratedNameSet`] |
//! | [`message`] | Chat-completion request/response shapes |

pub mod history;
pub mod message;
pub mod names;
pub mod settings;

pub use history::{Analytics, AnalyticsCounter, HistoryItem};
pub use message::{ChatCompletionRequest, ChatCompletionResponse, Message, MessageRole};
pub use names::GeneratedNameSet;
pub use settings::{NameCategory, Settings, Theme, MAX_NAMES, MIN_NAMES};
