//! CLI entry-point for inspecting the summary cache.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{config::Settings, data::cache::SummaryCache};

/// Args for the `cache` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Summary cache file.
    #[arg(long)]
    pub cache: Option<PathBuf>,
    /// Remove entries whose summary is empty so the next run regenerates them.
    #[arg(long)]
    pub prune_empty: bool,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let path = args.cache.unwrap_or(settings.cache_path);
    let mut cache = SummaryCache::load(&path).context("loading summary cache")?;

    println!("cache file: {}", path.display());
    println!("entries: {}", cache.len());
    println!("empty summaries: {}", cache.empty_count());

    if args.prune_empty {
        let removed = cache.prune_empty();
        if removed > 0 {
            cache.save()?;
        }
        info!(removed, "pruned empty cache entries");
        println!("removed: {removed}");
    }
    Ok(())
}
