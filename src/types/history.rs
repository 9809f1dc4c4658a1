use super::settings::NameCategory;
use serde::{Deserialize, Serialize};

/// One successful generation, as kept in the `history` blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub prompt: String,
    pub names: Vec<String>,
    pub category: NameCategory,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

/// Usage counters kept under `name_analytics`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub api_calls: u64,
    pub last_api_call: u64,
    pub generated_names: u64,
    pub favorites: u64,
    pub exports: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsCounter {
    ApiCalls,
    GeneratedNames,
    Favorites,
    Exports,
}

impl Analytics {
    /// Adjust a counter by `delta`, saturating at zero.
    pub fn adjust(&mut self, counter: AnalyticsCounter, delta: i64) {
        let slot = match counter {
            AnalyticsCounter::ApiCalls => &mut self.api_calls,
            AnalyticsCounter::GeneratedNames => &mut self.generated_names,
            AnalyticsCounter::Favorites => &mut self.favorites,
            AnalyticsCounter::Exports => &mut self.exports,
        };
        *slot = if delta >= 0 {
            slot.saturating_add(delta as u64)
        } else {
            slot.saturating_sub(delta.unsigned_abs())
        };
    }
}
