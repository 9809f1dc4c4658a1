//! Runtime configuration.
//!
//! Values come from defaults, optionally a YAML file, then `NAMEGEN_*` environment
//! overrides, in that order.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Primary model first, then the fallbacks in order.
pub const DEFAULT_MODELS: [&str; 4] = [
    "google/gemini-flash-1.5-exp",
    "meta-llama/llama-3.1-70b-instruct:free",
    "meta-llama/llama-3.2-3b-instruct:free",
    "google/gemini-flash-1.5-8b-exp",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
    pub api: ApiConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub endpoint: String,
    pub models: Vec<String>,
    /// Retries per model after the first attempt.
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub timeout_ms: u64,
    pub max_tokens: u32,
    /// Sent as `X-Title`.
    pub app_title: String,
    /// Sent as `HTTP-Referer`.
    pub referer: String,
    pub proxy_url: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            max_retries: 2,
            retry_delay_ms: 1_000,
            timeout_ms: 30_000,
            max_tokens: 1_000,
            app_title: "Name Generator".to_string(),
            referer: "http://localhost".to_string(),
            proxy_url: None,
        }
    }
}

impl GeneratorConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub cache_ttl_secs: u64,
    /// Requests allowed per endpoint inside one rate window.
    pub rate_limit: u32,
    pub rate_window_secs: u64,
    pub base_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 300,
            rate_limit: 5,
            rate_window_secs: 60,
            base_backoff_ms: 1_000,
            max_backoff_ms: 30_000,
            timeout_ms: 30_000,
        }
    }
}

impl ApiConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
    pub max_history: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            max_history: 50,
        }
    }
}

impl StorageConfig {
    /// Configured directory, else `<platform data dir>/namegen`, else `./.namegen`.
    pub fn resolved_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|d| d.join("namegen"))
            .unwrap_or_else(|| PathBuf::from(".namegen"))
    }
}

impl AppConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid configuration: {}", e),
                ErrorContext::new().with_source("config_loader"),
            )
        })
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("Cannot read configuration file: {}", e),
                ErrorContext::new()
                    .with_details(path.display().to_string())
                    .with_source("config_loader"),
            )
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> Self {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply `NAMEGEN_*` overrides read through `lookup`. Unparseable values are ignored.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("NAMEGEN_ENDPOINT") {
            self.generator.endpoint = v;
        }
        if let Some(v) = lookup("NAMEGEN_MODELS") {
            let models: Vec<String> = v
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect();
            if !models.is_empty() {
                self.generator.models = models;
            }
        }
        if let Some(secs) = parsed::<u64>(&lookup, "NAMEGEN_TIMEOUT_SECS") {
            self.generator.timeout_ms = secs.saturating_mul(1_000);
        }
        if let Some(n) = parsed(&lookup, "NAMEGEN_MAX_RETRIES") {
            self.generator.max_retries = n;
        }
        if let Some(ms) = parsed(&lookup, "NAMEGEN_RETRY_DELAY_MS") {
            self.generator.retry_delay_ms = ms;
        }
        if let Some(v) = lookup("NAMEGEN_APP_TITLE") {
            self.generator.app_title = v;
        }
        if let Some(v) = lookup("NAMEGEN_REFERER") {
            self.generator.referer = v;
        }
        if let Some(v) = lookup("NAMEGEN_PROXY_URL") {
            self.generator.proxy_url = Some(v);
        }
        if let Some(v) = lookup("NAMEGEN_DATA_DIR") {
            self.storage.data_dir = Some(PathBuf::from(v));
        }
        if let Some(secs) = parsed(&lookup, "NAMEGEN_CACHE_TTL_SECS") {
            self.api.cache_ttl_secs = secs;
        }
        if let Some(n) = parsed(&lookup, "NAMEGEN_RATE_LIMIT") {
            self.api.rate_limit = n;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.generator.endpoint).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid endpoint URL: {}", e),
                ErrorContext::new()
                    .with_field_path("generator.endpoint")
                    .with_details(self.generator.endpoint.clone()),
            )
        })?;
        if let Some(proxy) = &self.generator.proxy_url {
            url::Url::parse(proxy).map_err(|e| {
                Error::configuration_with_context(
                    format!("Invalid proxy URL: {}", e),
                    ErrorContext::new().with_field_path("generator.proxy_url"),
                )
            })?;
        }
        if self.generator.models.is_empty() {
            return Err(Error::configuration_with_context(
                "At least one model is required",
                ErrorContext::new().with_field_path("generator.models"),
            ));
        }
        if self.generator.timeout_ms == 0 || self.api.timeout_ms == 0 {
            return Err(Error::configuration_with_context(
                "Timeouts must be greater than zero",
                ErrorContext::new().with_field_path("generator.timeout_ms"),
            ));
        }
        // A zero rate limit turns throttling off; the window still has to be positive.
        if self.api.rate_window_secs == 0 {
            return Err(Error::configuration_with_context(
                "Rate window must be greater than zero",
                ErrorContext::new().with_field_path("api.rate_window_secs"),
            ));
        }
        if self.storage.max_history == 0 {
            return Err(Error::configuration_with_context(
                "History capacity must be greater than zero",
                ErrorContext::new().with_field_path("storage.max_history"),
            ));
        }
        Ok(())
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    lookup(name).and_then(|raw| raw.trim().parse().ok())
}
