//! Aggregate ROUGE evaluation over a whole run.

pub mod rouge;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::EvalError;

pub use rouge::{score_pair, PairScores, Score};

/// Metric name → score in `[0, 1]`, in a stable display order.
///
/// The bare metric name (`rouge1`) holds the F-measure; `_precision` and
/// `_recall` suffixes hold the other components.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EvaluationReport {
    metrics: IndexMap<String, f64>,
}

impl EvaluationReport {
    pub fn get(&self, metric: &str) -> Option<f64> {
        self.metrics.get(metric).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.metrics.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// Score `generated[i]` against `references[i]` and average over all pairs.
pub fn evaluate<G, R>(generated: &[G], references: &[R]) -> Result<EvaluationReport, EvalError>
where
    G: AsRef<str>,
    R: AsRef<str>,
{
    if generated.len() != references.len() {
        return Err(EvalError::InputLengthMismatch {
            generated: generated.len(),
            references: references.len(),
        });
    }

    let pairs: Vec<PairScores> = generated
        .iter()
        .zip(references)
        .map(|(cand, reference)| score_pair(reference.as_ref(), cand.as_ref()))
        .collect();

    let mut metrics = IndexMap::new();
    let columns: [(&str, fn(&PairScores) -> Score); 4] = [
        ("rouge1", |p: &PairScores| p.rouge1),
        ("rouge2", |p: &PairScores| p.rouge2),
        ("rougeL", |p: &PairScores| p.rouge_l),
        ("rougeLsum", |p: &PairScores| p.rouge_lsum),
    ];
    for (name, pick) in columns {
        let mean = mean_score(pairs.iter().map(pick));
        metrics.insert(name.to_string(), mean.fmeasure);
        metrics.insert(format!("{name}_precision"), mean.precision);
        metrics.insert(format!("{name}_recall"), mean.recall);
    }
    Ok(EvaluationReport { metrics })
}

fn mean_score(scores: impl Iterator<Item = Score>) -> Score {
    let mut total = Score::default();
    let mut n = 0usize;
    for score in scores {
        total.precision += score.precision;
        total.recall += score.recall;
        total.fmeasure += score.fmeasure;
        n += 1;
    }
    if n == 0 {
        return total;
    }
    let n = n as f64;
    Score {
        precision: total.precision / n,
        recall: total.recall / n,
        fmeasure: total.fmeasure / n,
    }
}
