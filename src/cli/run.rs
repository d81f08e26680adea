//! CLI entry-point for the full generate → cache → evaluate → report run.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    data::{self, cache::SummaryCache},
    eval,
    llm::{GenerationParams, OpenAiClient, RetryPolicy, SummaryGenerator},
    pipeline::BatchPipeline,
    report::{self, RunReport},
};

/// Args for the `run` command. Unset flags fall back to configuration.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// CSV or JSON Lines dataset with article and highlights fields.
    #[arg(long)]
    pub dataset: Option<PathBuf>,
    /// Summary cache file.
    #[arg(long)]
    pub cache: Option<PathBuf>,
    /// Number of records taken from the front of the dataset.
    #[arg(long)]
    pub sample_size: Option<usize>,
    /// Model identifier.
    #[arg(long)]
    pub model: Option<String>,
    /// Input budget in whitespace-delimited words.
    #[arg(long)]
    pub max_input_tokens: Option<usize>,
    /// Upper bound on generated tokens per summary.
    #[arg(long)]
    pub max_summary_tokens: Option<u32>,
    /// Sampling temperature.
    #[arg(long)]
    pub temperature: Option<f32>,
    /// Regenerate cached entries whose summary is empty.
    #[arg(long)]
    pub retry_empty: bool,
    /// Skip the per-article display.
    #[arg(long)]
    pub no_display: bool,
}

impl Args {
    fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(path) = &self.dataset {
            settings.dataset_path = path.clone();
        }
        if let Some(path) = &self.cache {
            settings.cache_path = path.clone();
        }
        if let Some(n) = self.sample_size {
            settings.sample_size = n;
        }
        if let Some(model) = &self.model {
            settings.model = model.clone();
        }
        if let Some(n) = self.max_input_tokens {
            settings.max_input_tokens = n;
        }
        if let Some(n) = self.max_summary_tokens {
            settings.max_summary_tokens = n;
        }
        if let Some(t) = self.temperature {
            settings.temperature = t;
        }
        settings.retry_empty |= self.retry_empty;
        settings
    }
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let settings = args.apply(settings);

    let client = OpenAiClient::from_settings(&settings)?;
    println!("API key loaded: yes");

    let cache = SummaryCache::load(&settings.cache_path).context("loading summary cache")?;
    let records = data::load_records(&settings.dataset_path, settings.sample_size)
        .context("loading dataset")?;
    info!(records = records.len(), model = %settings.model, "generating summaries");

    let generator = SummaryGenerator::new(client, GenerationParams::from_settings(&settings))
        .with_retry(RetryPolicy::from_settings(&settings));
    let mut pipeline = BatchPipeline::new(generator, cache).retry_empty(settings.retry_empty);
    let outcome = pipeline.run(&records).await?;

    info!("evaluating summaries");
    let summaries = outcome.summaries();
    let references: Vec<&str> = records.iter().map(|r| r.reference.as_str()).collect();
    let metrics = eval::evaluate(summaries.as_slice(), references.as_slice())?;

    report::print_scores(&metrics);
    if !args.no_display {
        report::print_articles(&records, &outcome);
    }
    report::write_json(&settings, &RunReport::new(&settings, &outcome, &metrics))?;
    Ok(())
}
