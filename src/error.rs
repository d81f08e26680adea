//! Typed failures for each stage of a run.

use std::path::PathBuf;

use thiserror::Error;

/// Startup configuration problems. Raised before any generation attempt.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing credential: set {0} before running")]
    MissingCredential(&'static str),
}

/// Cache file failures. Fatal to the run.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read cache file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cache file {path:?} is corrupt; refusing to start from an empty cache")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write cache file {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Completion call failures. Contained at the generator boundary.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completion service returned {status}: {body}")]
    Service { status: u16, body: String },
    #[error("malformed completion response: {0}")]
    Malformed(String),
}

impl GenerationError {
    /// Transport failures, rate limiting and server errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Service { status, .. } => *status == 429 || *status >= 500,
            Self::Malformed(_) => false,
        }
    }
}

/// Evaluator input problems.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("input length mismatch: {generated} generated summaries vs {references} references")]
    InputLengthMismatch { generated: usize, references: usize },
}

/// Dataset loading failures.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open dataset {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse dataset {path:?} at record {record}: {message}")]
    Parse {
        path: PathBuf,
        record: usize,
        message: String,
    },
    #[error("dataset {path:?} has no `{field}` column")]
    MissingField { path: PathBuf, field: &'static str },
}
