//! 补全后端：对话补全请求的 I/O 接缝。
//!
//! Chat-completion backends. [`NameGenerator`](super::NameGenerator) only talks to this
//! trait, so the fallback loop can be driven by scripted backends in tests.

use crate::config::GeneratorConfig;
use crate::error::messages;
use crate::parser::first_choice_content;
use crate::transport::{HttpRequest, HttpTransport};
use crate::types::message::{ApiErrorBody, ChatCompletionRequest, ChatCompletionResponse};
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// One chat-completion call, returning the raw assistant text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<String>;

    /// Whether a credential is available. Unconfigured backends are never called.
    fn is_configured(&self) -> bool {
        true
    }

    fn name(&self) -> &str;
}

/// OpenAI-compatible chat-completions endpoint (OpenRouter by default).
pub struct OpenRouterBackend {
    transport: HttpTransport,
    endpoint: String,
    api_key: Option<String>,
    referer: String,
    app_title: String,
    timeout: Duration,
}

impl OpenRouterBackend {
    pub fn new(transport: HttpTransport, config: &GeneratorConfig, api_key: Option<String>) -> Self {
        Self {
            transport,
            endpoint: config.endpoint.clone(),
            api_key: api_key.and_then(crate::credentials::non_blank),
            referer: config.referer.clone(),
            app_title: config.app_title.clone(),
            timeout: config.timeout(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(&self, request: &ChatCompletionRequest) -> Result<HttpRequest> {
        let key = self.api_key.as_deref().ok_or_else(Error::missing_credential)?;
        HttpRequest::post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", key))
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.app_title)
            .json(request)
    }
}

#[async_trait]
impl CompletionBackend for OpenRouterBackend {
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<String> {
        let http = self.build_request(request)?;
        let response = self.transport.fetch_with_timeout(http, self.timeout).await?;
        debug!(
            model = request.model.as_str(),
            status = response.status,
            "completion response received"
        );

        if !response.is_success() {
            let message = ApiErrorBody::message_from(&response.body)
                .unwrap_or_else(|| messages::UNKNOWN.to_string());
            return Err(Error::Api {
                status: response.status,
                message,
            });
        }

        let parsed: ChatCompletionResponse = response.json()?;
        Ok(first_choice_content(&parsed).to_string())
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn name(&self) -> &str {
        "openrouter"
    }
}
