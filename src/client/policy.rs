use std::time::Duration;

/// Position in the fallback ladder: which model, which attempt (0-based) on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    pub model_index: usize,
    pub attempt: u32,
}

/// What happened to one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed { retryable: bool },
}

/// Next step after an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Success,
    RetrySameModel { next: Attempt, delay: Duration },
    AdvanceModel { next: Attempt },
    Exhausted,
}

/// Priority-ordered models, each tried up to `max_retries + 1` times with linear backoff.
///
/// This is pure bookkeeping: it never performs I/O or sleeps, so every path through the
/// ladder can be checked without a network.
#[derive(Debug, Clone)]
pub struct FallbackLadder {
    models: Vec<String>,
    max_retries: u32,
    retry_delay: Duration,
}

impl FallbackLadder {
    pub fn new(models: Vec<String>, max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            models,
            max_retries,
            retry_delay,
        }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn model(&self, index: usize) -> Option<&str> {
        self.models.get(index).map(String::as_str)
    }

    pub fn attempts_per_model(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// First attempt, or `None` for an empty ladder.
    pub fn start(&self) -> Option<Attempt> {
        if self.models.is_empty() {
            None
        } else {
            Some(Attempt {
                model_index: 0,
                attempt: 0,
            })
        }
    }

    /// Linear backoff: `retry_delay * (attempt + 1)`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay.saturating_mul(attempt.saturating_add(1))
    }

    pub fn transition(&self, at: Attempt, outcome: Outcome) -> Transition {
        let retryable = match outcome {
            Outcome::Succeeded => return Transition::Success,
            Outcome::Failed { retryable } => retryable,
        };
        if !retryable {
            return Transition::Exhausted;
        }

        if at.attempt < self.max_retries {
            return Transition::RetrySameModel {
                next: Attempt {
                    model_index: at.model_index,
                    attempt: at.attempt + 1,
                },
                delay: self.backoff(at.attempt),
            };
        }

        let next_model = at.model_index + 1;
        if next_model < self.models.len() {
            Transition::AdvanceModel {
                next: Attempt {
                    model_index: next_model,
                    attempt: 0,
                },
            }
        } else {
            Transition::Exhausted
        }
    }
}
