use super::backend::CompletionBackend;
use super::policy::{Attempt, FallbackLadder, Outcome, Transition};
use super::types::GenerationStats;
use crate::parser::extract_names;
use crate::prompt::{build_prompt, SYSTEM_PROMPT};
use crate::types::{ChatCompletionRequest, Message, Settings};
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Turns [`Settings`] into names by walking the model fallback ladder.
///
/// Each model gets `max_retries + 1` attempts with linear backoff between them before
/// the next model is tried. Generations are never cached.
pub struct NameGenerator {
    pub(crate) backend: Arc<dyn CompletionBackend>,
    pub(crate) ladder: FallbackLadder,
    pub(crate) max_tokens: u32,
}

impl NameGenerator {
    pub fn new(backend: Arc<dyn CompletionBackend>, ladder: FallbackLadder, max_tokens: u32) -> Self {
        Self {
            backend,
            ladder,
            max_tokens,
        }
    }

    pub fn builder() -> super::builder::NameGeneratorBuilder {
        super::builder::NameGeneratorBuilder::new()
    }

    pub fn models(&self) -> &[String] {
        self.ladder.models()
    }

    pub fn backend(&self) -> &Arc<dyn CompletionBackend> {
        &self.backend
    }

    /// Generate at most `settings.num_names` names.
    pub async fn generate(&self, settings: &Settings) -> Result<Vec<String>> {
        self.generate_with_stats(settings).await.map(|(names, _)| names)
    }

    pub async fn generate_with_stats(
        &self,
        settings: &Settings,
    ) -> Result<(Vec<String>, GenerationStats)> {
        let prompt = build_prompt(settings);
        if !self.backend.is_configured() {
            return Err(Error::missing_credential());
        }

        let request_id = Uuid::new_v4().to_string();
        let limit = settings.num_names as usize;
        let start = std::time::Instant::now();
        let mut attempts = 0u32;
        let mut last_error: Option<Error> = None;
        let mut at = self.ladder.start();

        while let Some(current) = at {
            let Some(model) = self.ladder.model(current.model_index) else {
                break;
            };
            attempts += 1;
            debug!(
                request_id = request_id.as_str(),
                model,
                attempt = current.attempt + 1,
                "requesting names"
            );

            let request = self.chat_request(model, &prompt, settings);
            let result = match self.backend.complete(&request).await {
                Ok(content) => extract_names(&content, limit),
                Err(e) => Err(e),
            };

            let outcome = match &result {
                Ok(_) => Outcome::Succeeded,
                Err(e) => Outcome::Failed {
                    retryable: e.is_retryable(),
                },
            };

            match self.ladder.transition(current, outcome) {
                Transition::Success => {
                    let names = result?;
                    let stats = GenerationStats {
                        request_id,
                        model: model.to_string(),
                        attempts,
                        duration_ms: start.elapsed().as_millis(),
                    };
                    info!(
                        request_id = stats.request_id.as_str(),
                        model,
                        attempts,
                        names = names.len(),
                        duration_ms = stats.duration_ms as u64,
                        "names generated"
                    );
                    return Ok((names, stats));
                }
                next => {
                    if let Err(e) = result {
                        warn!(
                            request_id = request_id.as_str(),
                            model,
                            attempt = current.attempt + 1,
                            error = %e,
                            "generation attempt failed"
                        );
                        last_error = Some(e);
                    }
                    at = self.step(next, model).await;
                }
            }
        }

        Err(last_error.unwrap_or_else(Error::unknown))
    }

    /// Sleep or log as the transition demands and return the next attempt, if any.
    async fn step(&self, transition: Transition, model: &str) -> Option<Attempt> {
        match transition {
            Transition::RetrySameModel { next, delay } => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Some(next)
            }
            Transition::AdvanceModel { next } => {
                warn!(
                    from = model,
                    to = self.ladder.model(next.model_index).unwrap_or(""),
                    "switching to fallback model"
                );
                Some(next)
            }
            Transition::Success | Transition::Exhausted => None,
        }
    }

    fn chat_request(&self, model: &str, prompt: &str, settings: &Settings) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![Message::system(SYSTEM_PROMPT), Message::user(prompt)],
            temperature: settings.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    struct Fixed {
        reply: &'static str,
        calls: AtomicU32,
        configured: bool,
    }

    #[async_trait]
    impl CompletionBackend for Fixed {
        async fn complete(&self, _request: &ChatCompletionRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.to_string())
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn generator(reply: &'static str, configured: bool) -> (Arc<Fixed>, NameGenerator) {
        let backend = Arc::new(Fixed {
            reply,
            calls: AtomicU32::new(0),
            configured,
        });
        let ladder = FallbackLadder::new(vec!["a".into(), "b".into()], 2, Duration::ZERO);
        (backend.clone(), NameGenerator::new(backend, ladder, 1000))
    }

    #[tokio::test]
    async fn test_truncates_to_requested_count() {
        let (_, g) = generator("A, B, C, D, E, F", true);
        let names = g
            .generate(&Settings::default().with_num_names(3))
            .await
            .unwrap();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_unconfigured_backend_fails_fast() {
        let (backend, g) = generator("A", false);
        let err = g.generate(&Settings::default()).await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_reply_walks_whole_ladder() {
        let (backend, g) = generator(" , ,", true);
        let err = g.generate(&Settings::default()).await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::NoNames);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn test_stats_report_model_and_attempts() {
        let (_, g) = generator("Nova", true);
        let (names, stats) = g.generate_with_stats(&Settings::default()).await.unwrap();
        assert_eq!(names, vec!["Nova"]);
        assert_eq!(stats.model, "a");
        assert_eq!(stats.attempts, 1);
        assert_eq!(stats.request_id.len(), 36);
    }
}
