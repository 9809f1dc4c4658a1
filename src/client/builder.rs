use super::backend::{CompletionBackend, OpenRouterBackend};
use super::core::NameGenerator;
use super::policy::FallbackLadder;
use crate::config::GeneratorConfig;
use crate::transport::HttpTransport;
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`NameGenerator`].
///
/// Starts from [`GeneratorConfig::default`]; every knob can be overridden before
/// [`build`](Self::build). Without an explicit key the credential chain in
/// [`crate::credentials`] is consulted.
pub struct NameGeneratorBuilder {
    config: GeneratorConfig,
    api_key: Option<String>,
    resolve_key: bool,
    backend: Option<Arc<dyn CompletionBackend>>,
    transport: Option<HttpTransport>,
}

impl NameGeneratorBuilder {
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default(),
            api_key: None,
            resolve_key: true,
            backend: None,
            transport: None,
        }
    }

    pub fn config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Skip the keyring/environment lookup when no explicit key was given.
    pub fn without_credential_lookup(mut self) -> Self {
        self.resolve_key = false;
        self
    }

    /// Replace the HTTP backend entirely (scripted backends in tests).
    pub fn backend(mut self, backend: Arc<dyn CompletionBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Reuse an existing transport instead of building one from `proxy_url`.
    pub fn transport(mut self, transport: HttpTransport) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Override the chat-completions URL (mock servers in tests).
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn models(mut self, models: Vec<String>) -> Self {
        self.config.models = models;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn build(self) -> Result<NameGenerator> {
        if self.config.models.is_empty() {
            return Err(Error::configuration_with_context(
                "At least one model is required",
                ErrorContext::new()
                    .with_field_path("generator.models")
                    .with_source("name_generator_builder"),
            ));
        }

        let backend = match self.backend {
            Some(backend) => backend,
            None => {
                let transport = match self.transport {
                    Some(t) => t,
                    None => HttpTransport::new(self.config.proxy_url.as_deref())?,
                };
                let key = match self.api_key {
                    Some(key) => Some(key),
                    None if self.resolve_key => crate::credentials::resolve_api_key(),
                    None => None,
                };
                Arc::new(OpenRouterBackend::new(transport, &self.config, key))
                    as Arc<dyn CompletionBackend>
            }
        };

        let ladder = FallbackLadder::new(
            self.config.models.clone(),
            self.config.max_retries,
            self.config.retry_delay(),
        );
        Ok(NameGenerator::new(backend, ladder, self.config.max_tokens))
    }
}

impl Default for NameGeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ladder() {
        let g = NameGeneratorBuilder::new()
            .api_key("k")
            .transport(HttpTransport::from_client(reqwest::Client::new()))
            .build()
            .unwrap();
        assert_eq!(g.models().len(), 4);
        assert_eq!(g.models()[0], "google/gemini-flash-1.5-exp");
        assert!(g.backend().is_configured());
    }

    #[test]
    fn test_empty_models_rejected() {
        let err = NameGeneratorBuilder::new()
            .models(Vec::new())
            .build()
            .err()
            .unwrap();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
    }

    #[test]
    fn test_no_lookup_leaves_backend_unconfigured() {
        let g = NameGeneratorBuilder::new()
            .without_credential_lookup()
            .transport(HttpTransport::from_client(reqwest::Client::new()))
            .build()
            .unwrap();
        assert!(!g.backend().is_configured());
    }
}
