//! CLI entry-point for a single uncached generation.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    llm::{Generation, GenerationParams, OpenAiClient, RetryPolicy, SummaryGenerator},
};

/// Args for the `smoke` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Text to summarise.
    #[arg(
        long,
        default_value = "OpenAI creates cutting-edge AI tools for research and development."
    )]
    pub text: String,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let client = OpenAiClient::from_settings(&settings)?;
    let generator = SummaryGenerator::new(client, GenerationParams::from_settings(&settings))
        .with_retry(RetryPolicy::from_settings(&settings));

    match generator.generate(&args.text).await {
        Generation::Success(summary) => {
            info!(chars = summary.len(), "smoke generation succeeded");
            println!("Test summary: {summary}");
        }
        Generation::Failure(reason) => {
            println!("Test summary failed: {reason}");
        }
    }
    Ok(())
}
