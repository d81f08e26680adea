//! Cache-backed LLM summary generation and ROUGE evaluation.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod eval;
pub mod llm;
pub mod logging;
pub mod pipeline;
pub mod report;
