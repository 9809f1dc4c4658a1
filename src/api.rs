//! 通用请求服务：带持久化缓存与限流的 JSON 请求。
//!
//! General-purpose JSON request helper guarded by the response cache and the
//! per-endpoint rate limiter.

use crate::cache::{CacheConfig, CacheKey, ResponseCache};
use crate::clock::Clock;
use crate::config::ApiConfig;
use crate::resilience::rate_limiter::{RateLimiter, RateLimiterConfig};
use crate::storage::KeyValueStore;
use crate::transport::{HttpRequest, HttpTransport, Method};
use crate::types::message::ApiErrorBody;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Per-call options. The default is a bodiless GET.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            headers: Vec::new(),
            body: Some(body.into()),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    fn is_cacheable(&self) -> bool {
        self.method == Method::GET
    }
}

pub struct ApiService {
    transport: HttpTransport,
    cache: ResponseCache,
    limiter: RateLimiter,
    timeout: Duration,
}

impl ApiService {
    pub fn new(
        transport: HttpTransport,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        config: &ApiConfig,
    ) -> Self {
        let cache = ResponseCache::load(
            CacheConfig::new().with_ttl(config.cache_ttl()),
            store,
            clock.clone(),
        );
        let limiter = RateLimiter::new(RateLimiterConfig::from(config), clock);
        Self::from_parts(transport, cache, limiter, config.timeout())
    }

    pub fn from_parts(
        transport: HttpTransport,
        cache: ResponseCache,
        limiter: RateLimiter,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            cache,
            limiter,
            timeout,
        }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Issue a request and decode the JSON response into `T`.
    pub async fn request<T: DeserializeOwned>(&self, url: &str, options: RequestOptions) -> Result<T> {
        let value = self.request_json(url, options).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Issue a request and return the raw JSON response.
    ///
    /// Successful GETs are served from and written to the cache. Any failure evicts the
    /// request's cache entry before the error is returned.
    pub async fn request_json(&self, url: &str, options: RequestOptions) -> Result<serde_json::Value> {
        let key = CacheKey::for_request(options.method.as_str(), url, options.body.as_deref());

        self.cache.sweep();

        if options.is_cacheable() {
            if let Some(cached) = self.cache.get(&key) {
                info!(url, "returning cached response");
                return Ok(cached);
            }
        }

        self.limiter.throttle(url).await;

        match self.execute(url, &options).await {
            Ok(data) => {
                if options.is_cacheable() {
                    self.cache.insert(&key, data.clone());
                }
                Ok(data)
            }
            Err(e) => {
                warn!(url, error = %e, "API request failed");
                self.cache.evict(&key);
                Err(e)
            }
        }
    }

    async fn execute(&self, url: &str, options: &RequestOptions) -> Result<serde_json::Value> {
        let mut request = HttpRequest::new(options.method.clone(), url);
        if !options
            .headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("content-type"))
        {
            request = request.header("Content-Type", "application/json");
        }
        for (name, value) in &options.headers {
            request = request.header(name.clone(), value.clone());
        }
        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }

        let response = self.transport.fetch_with_timeout(request, self.timeout).await?;
        debug!(url, status = response.status, "API response received");

        if !response.is_success() {
            let message = ApiErrorBody::message_from(&response.body).unwrap_or_else(|| {
                format!(
                    "API request failed with status {}: {}",
                    response.status, response.reason
                )
            });
            return Err(Error::Request {
                status: response.status,
                message,
            });
        }

        response.json()
    }
}
