//! Summary generation with input truncation, bounded retry and fail-soft errors.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::{
    config::Settings,
    llm::{ChatMessage, CompletionRequest, CompletionService},
};

const SYSTEM_PROMPT: &str = "You are an expert summarizer.";

/// Outcome of one summary generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// Trimmed text of the top completion choice. May be empty.
    Success(String),
    /// The call failed; carries the reason for logging.
    Failure(String),
}

impl Generation {
    /// Text to record for this article. Failures map to the empty string.
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) => text,
            Self::Failure(_) => "",
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Success(text) => text,
            Self::Failure(_) => String::new(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

/// Request parameters taken from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub model: String,
    pub max_input_tokens: usize,
    pub max_summary_tokens: u32,
    pub temperature: f32,
}

impl GenerationParams {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            model: settings.model.clone(),
            max_input_tokens: settings.max_input_tokens,
            max_summary_tokens: settings.max_summary_tokens,
            temperature: settings.temperature,
        }
    }
}

/// Bounded exponential backoff for retryable failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_retries: settings.max_retries,
            base_delay: Duration::from_millis(settings.retry_backoff_ms),
        }
    }

    /// Delay before retry number `attempt` (0-based): `base * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Keep at most `budget` whitespace-delimited words.
///
/// Text within budget is returned unchanged; longer text is cut to the first
/// `budget` words re-joined with single spaces.
pub fn truncate_words(text: &str, budget: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > budget {
        words[..budget].join(" ")
    } else {
        text.to_string()
    }
}

/// Wraps a [`CompletionService`] and never lets a call failure escape.
pub struct SummaryGenerator<C> {
    client: C,
    params: GenerationParams,
    retry: RetryPolicy,
}

impl<C: CompletionService> SummaryGenerator<C> {
    pub fn new(client: C, params: GenerationParams) -> Self {
        Self {
            client,
            params,
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Frame the (truncated) article as a chat request.
    pub fn build_request(&self, article: &str) -> CompletionRequest {
        let text = truncate_words(article, self.params.max_input_tokens);
        CompletionRequest {
            model: self.params.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(format!("Summarize the following text:\n\n{text}")),
            ],
            max_tokens: self.params.max_summary_tokens,
            temperature: self.params.temperature,
        }
    }

    /// Generate a summary for `article`.
    pub async fn generate(&self, article: &str) -> Generation {
        let request = self.build_request(article);
        let mut attempt = 0;
        loop {
            match self.client.complete(&request).await {
                Ok(text) => {
                    debug!(attempt, chars = text.len(), "completion succeeded");
                    return Generation::Success(text.trim().to_string());
                }
                Err(err) if err.is_retryable() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(%err, attempt, ?delay, "completion failed; retrying");
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    warn!(%err, attempt, "completion failed; recording empty summary");
                    return Generation::Failure(err.to_string());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_keeps_leading_words() {
        assert_eq!(truncate_words("A B C D E", 3), "A B C");
        assert_eq!(truncate_words("  one\ttwo\n\nthree four ", 2), "one two");
    }

    #[test]
    fn text_within_budget_is_untouched() {
        assert_eq!(truncate_words("keep  the\nspacing", 3), "keep  the\nspacing");
        assert_eq!(truncate_words("", 0), "");
    }

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(400));
    }
}
