//! Command-line interface wiring for llm-summary-eval.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod cache;
pub mod run;
pub mod smoke;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Cache-backed LLM summarisation with ROUGE scoring", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Run(args) => run::run(args, settings).await,
            Commands::Smoke(args) => smoke::run(args, settings).await,
            Commands::Cache(args) => cache::run(args, settings),
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Summarise a dataset sample through the cache and report ROUGE scores.
    Run(run::Args),
    /// Generate one summary for a sample sentence, bypassing the cache.
    Smoke(smoke::Args),
    /// Inspect or prune the summary cache.
    Cache(cache::Args),
}
