//! Console report and JSON artefact for a completed run.

use std::{fs::File, io::BufWriter, path::PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::{
    config::Settings,
    data::Record,
    eval::{score_pair, EvaluationReport},
    pipeline::RunOutcome,
};

const ARTICLE_PREVIEW_CHARS: usize = 500;

/// Persisted summary of one run.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub generated_at: String,
    pub model: &'a str,
    pub sample_size: usize,
    pub cache_hits: usize,
    pub generated: usize,
    pub failed: usize,
    pub metrics: &'a EvaluationReport,
}

impl<'a> RunReport<'a> {
    pub fn new(settings: &'a Settings, outcome: &RunOutcome, metrics: &'a EvaluationReport) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            model: &settings.model,
            sample_size: outcome.articles.len(),
            cache_hits: outcome.cache_hits(),
            generated: outcome.generated(),
            failed: outcome.failed(),
            metrics,
        }
    }
}

/// `rouge1: 0.42` lines, one per metric.
pub fn format_scores(report: &EvaluationReport) -> String {
    report
        .iter()
        .map(|(name, value)| format!("{name}: {value:.2}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// First 500 characters of an article followed by `...`.
pub fn article_preview(article: &str) -> String {
    let head: String = article.chars().take(ARTICLE_PREVIEW_CHARS).collect();
    format!("{head}...")
}

pub fn print_scores(report: &EvaluationReport) {
    println!("\nROUGE Scores:");
    println!("{}", format_scores(report));
}

/// Side-by-side display of article, generated and reference summaries.
pub fn print_articles(records: &[Record], outcome: &RunOutcome) {
    for (record, article) in records.iter().zip(&outcome.articles) {
        let scores = score_pair(&record.reference, &article.summary);
        println!("\nArticle {} ({:?}):", article.index + 1, article.state);
        println!("{}", article_preview(&record.article));
        println!("\nGenerated Summary:");
        println!("{}", article.summary);
        println!("\nReference Summary:");
        println!("{}", record.reference);
        println!(
            "\nROUGE-1 F: {:.2}  ROUGE-2 F: {:.2}  ROUGE-L F: {:.2}",
            scores.rouge1.fmeasure, scores.rouge2.fmeasure, scores.rouge_l.fmeasure
        );
        println!("\n{}", "=".repeat(80));
    }
}

/// Write the run report to `outputs_dir/rouge_report.json`.
pub fn write_json(settings: &Settings, report: &RunReport<'_>) -> Result<PathBuf> {
    let path = settings.join_output("rouge_report.json");
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("creating outputs dir")?;
    }
    let file = File::create(&path).with_context(|| format!("create {path:?}"))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)?;
    info!(path = %path.display(), "wrote run report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_counts_characters_not_bytes() {
        let article = "é".repeat(600);
        let preview = article_preview(&article);
        assert_eq!(preview.chars().count(), ARTICLE_PREVIEW_CHARS + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn scores_use_two_decimals() {
        let report = crate::eval::evaluate(&["a b"], &["a b"]).unwrap();
        let text = format_scores(&report);
        assert!(text.lines().next().unwrap().starts_with("rouge1: 1.00"));
    }
}
