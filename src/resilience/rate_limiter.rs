use crate::clock::Clock;
use crate::config::ApiConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct RateLimiterSnapshot {
    pub endpoint: String,
    /// Requests recorded for the endpoint inside the current window.
    pub recent_requests: u32,
    pub max_requests: u32,
    pub window: Duration,
    /// Delay the next request would incur, if it would be throttled.
    pub estimated_delay: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Requests allowed per endpoint inside one window.
    pub max_requests: u32,
    pub window: Duration,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RateLimiterConfig {
    pub fn new() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(60),
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }

    pub fn with_max_requests(mut self, max_requests: u32) -> Self {
        self.max_requests = max_requests;
        self
    }

    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&ApiConfig> for RateLimiterConfig {
    fn from(cfg: &ApiConfig) -> Self {
        Self {
            max_requests: cfg.rate_limit,
            window: Duration::from_secs(cfg.rate_window_secs),
            base_delay: Duration::from_millis(cfg.base_backoff_ms),
            max_delay: Duration::from_millis(cfg.max_backoff_ms),
        }
    }
}

/// Sliding-window request governor keyed by endpoint.
///
/// Counters are stored as `endpoint:bucket_ms -> count`. Over-limit requests are
/// delayed with exponential backoff, never rejected.
pub struct RateLimiter {
    cfg: RateLimiterConfig,
    clock: Arc<dyn Clock>,
    counts: Mutex<HashMap<String, u32>>,
}

fn split_key(key: &str) -> Option<(&str, u64)> {
    let (endpoint, bucket) = key.rsplit_once(':')?;
    Some((endpoint, bucket.parse().ok()?))
}

impl RateLimiter {
    pub fn new(cfg: RateLimiterConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            cfg,
            clock,
            counts: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RateLimiterConfig {
        &self.cfg
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, u32>> {
        self.counts.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn window_start(&self, now: u64) -> u64 {
        now.saturating_sub(self.cfg.window.as_millis() as u64)
    }

    fn prune_locked(counts: &mut HashMap<String, u32>, window_start: u64) {
        counts.retain(|key, _| matches!(split_key(key), Some((_, bucket)) if bucket >= window_start));
    }

    fn count_locked(counts: &HashMap<String, u32>, endpoint: &str, window_start: u64) -> u32 {
        counts
            .iter()
            .filter_map(|(key, count)| match split_key(key) {
                Some((ep, bucket)) if ep == endpoint && bucket >= window_start => Some(*count),
                _ => None,
            })
            .sum()
    }

    /// `min(base * 2^excess, max)`.
    pub fn backoff_for(&self, excess: u32) -> Duration {
        let factor = 2u32.checked_pow(excess).unwrap_or(u32::MAX);
        self.cfg
            .base_delay
            .checked_mul(factor)
            .map_or(self.cfg.max_delay, |d| d.min(self.cfg.max_delay))
    }

    fn delay_for(&self, recent: u32) -> Option<Duration> {
        (recent > self.cfg.max_requests).then(|| self.backoff_for(recent - self.cfg.max_requests))
    }

    /// Count one request against `endpoint` and return the delay it must wait, if any.
    pub fn record(&self, endpoint: &str) -> Option<Duration> {
        if self.cfg.max_requests == 0 {
            return None;
        }
        let now = self.clock.now_ms();
        let window_start = self.window_start(now);
        let mut counts = self.lock();
        *counts.entry(format!("{}:{}", endpoint, now)).or_insert(0) += 1;
        Self::prune_locked(&mut counts, window_start);
        let recent = Self::count_locked(&counts, endpoint, window_start);
        self.delay_for(recent)
    }

    pub fn recent_requests(&self, endpoint: &str) -> u32 {
        let window_start = self.window_start(self.clock.now_ms());
        Self::count_locked(&self.lock(), endpoint, window_start)
    }

    /// Record a request and sleep out any throttling delay. Returns the time waited.
    pub async fn throttle(&self, endpoint: &str) -> Duration {
        match self.record(endpoint) {
            Some(delay) => {
                warn!(
                    endpoint,
                    delay_ms = delay.as_millis() as u64,
                    "rate limit exceeded, delaying request"
                );
                tokio::time::sleep(delay).await;
                delay
            }
            None => Duration::ZERO,
        }
    }

    pub fn snapshot(&self, endpoint: &str) -> RateLimiterSnapshot {
        let recent = self.recent_requests(endpoint);
        RateLimiterSnapshot {
            endpoint: endpoint.to_string(),
            recent_requests: recent,
            max_requests: self.cfg.max_requests,
            window: self.cfg.window,
            estimated_delay: self.delay_for(recent + 1),
        }
    }
}
