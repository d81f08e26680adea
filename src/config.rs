//! Runtime configuration for llm-summary-eval.

use std::{
    env,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable holding the completion service credential.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Application configuration resolved from `.env`, the environment and defaults.
///
/// Built once at process start and handed to every component by reference.
#[derive(Clone, Deserialize)]
pub struct Settings {
    /// Bearer credential for the completion service. Never logged.
    pub api_key: Option<String>,
    /// Base URL of the chat-completions API, without a trailing slash.
    pub api_base: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Input budget in whitespace-delimited words.
    pub max_input_tokens: usize,
    /// Upper bound on generated tokens per summary.
    pub max_summary_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Number of records taken from the front of the dataset.
    pub sample_size: usize,
    /// JSON file mapping article text to summary text.
    pub cache_path: PathBuf,
    /// CSV or JSON Lines file with `article` / `highlights` fields.
    pub dataset_path: PathBuf,
    /// Root folder for report artefacts.
    pub outputs_dir: PathBuf,
    /// Per-request timeout for the completion service.
    pub request_timeout_secs: u64,
    /// Extra attempts after a retryable generation failure.
    pub max_retries: u32,
    /// Base delay for exponential backoff between attempts.
    pub retry_backoff_ms: u64,
    /// Treat cached empty summaries as misses and regenerate them.
    pub retry_empty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            max_input_tokens: 4000,
            max_summary_tokens: 150,
            temperature: 0.5,
            sample_size: 10,
            cache_path: PathBuf::from("summaries_cache.json"),
            dataset_path: PathBuf::from("data/test.csv"),
            outputs_dir: PathBuf::from("./outputs"),
            request_timeout_secs: 60,
            max_retries: 2,
            retry_backoff_ms: 500,
            retry_empty: false,
        }
    }
}

impl Settings {
    /// Load configuration from `.env` and the environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let api_key = env::var(API_KEY_VAR).ok().filter(|v| !v.trim().is_empty());
        let api_base = env::var("OPENAI_API_BASE")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base);
        let model = env::var("MODEL_NAME").unwrap_or(defaults.model);
        let cache_path = env::var("SUMMARY_CACHE")
            .map(PathBuf::from)
            .unwrap_or(defaults.cache_path);
        let dataset_path = env::var("DATASET_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.dataset_path);
        let outputs_dir = env::var("OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.outputs_dir);

        Ok(Self {
            api_key,
            api_base,
            model,
            max_input_tokens: parsed_var("MAX_INPUT_TOKENS").unwrap_or(defaults.max_input_tokens),
            max_summary_tokens: parsed_var("MAX_SUMMARY_TOKENS")
                .unwrap_or(defaults.max_summary_tokens),
            temperature: parsed_var("TEMPERATURE").unwrap_or(defaults.temperature),
            sample_size: parsed_var("SAMPLE_SIZE").unwrap_or(defaults.sample_size),
            cache_path,
            dataset_path,
            outputs_dir,
            request_timeout_secs: parsed_var("REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout_secs),
            max_retries: parsed_var("MAX_RETRIES").unwrap_or(defaults.max_retries),
            retry_backoff_ms: parsed_var("RETRY_BACKOFF_MS").unwrap_or(defaults.retry_backoff_ms),
            retry_empty: parsed_var("RETRY_EMPTY_CACHED").unwrap_or(defaults.retry_empty),
        })
    }

    /// Return the credential or fail before any generation is attempted.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingCredential(API_KEY_VAR))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Convenience helper for derived output path segments.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.outputs_dir.join(path)
    }
}

// Hand-written so the credential never reaches a log line through `?settings`.
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("max_input_tokens", &self.max_input_tokens)
            .field("max_summary_tokens", &self.max_summary_tokens)
            .field("temperature", &self.temperature)
            .field("sample_size", &self.sample_size)
            .field("cache_path", &self.cache_path)
            .field("dataset_path", &self.dataset_path)
            .field("outputs_dir", &self.outputs_dir)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("retry_empty", &self.retry_empty)
            .finish()
    }
}

fn parsed_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_key_is_a_configuration_error() {
        let settings = Settings {
            api_key: Some("   ".into()),
            ..Settings::default()
        };
        assert!(matches!(
            settings.require_api_key(),
            Err(ConfigError::MissingCredential(API_KEY_VAR))
        ));
    }

    #[test]
    fn debug_output_redacts_key() {
        let settings = Settings {
            api_key: Some("sk-secret".into()),
            ..Settings::default()
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
