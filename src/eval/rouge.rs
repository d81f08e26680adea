//! ROUGE n-gram and longest-common-subsequence overlap scores.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

/// Precision, recall and F-measure for one metric.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Score {
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
}

impl Score {
    fn from_counts(hits: usize, candidate_total: usize, reference_total: usize) -> Self {
        if candidate_total == 0 || reference_total == 0 {
            return Self::default();
        }
        let precision = hits as f64 / candidate_total as f64;
        let recall = hits as f64 / reference_total as f64;
        Self {
            precision,
            recall,
            fmeasure: fmeasure(precision, recall),
        }
    }
}

fn fmeasure(precision: f64, recall: f64) -> f64 {
    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}

/// Lowercase and split on anything that is not an ASCII letter or digit.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    NON_ALNUM
        .split(&lowered)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn ngram_counts(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    if n == 0 || tokens.len() < n {
        return counts;
    }
    for window in tokens.windows(n) {
        *counts.entry(window).or_insert(0) += 1;
    }
    counts
}

/// ROUGE-N with clipped n-gram counts.
pub fn rouge_n(reference: &[String], candidate: &[String], n: usize) -> Score {
    let ref_counts = ngram_counts(reference, n);
    let cand_counts = ngram_counts(candidate, n);
    let hits = ref_counts
        .iter()
        .map(|(gram, &count)| count.min(cand_counts.get(gram).copied().unwrap_or(0)))
        .sum();
    Score::from_counts(
        hits,
        cand_counts.values().sum(),
        ref_counts.values().sum(),
    )
}

fn lcs_table(a: &[String], b: &[String]) -> Vec<Vec<usize>> {
    let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            table[i][j] = if a[i - 1] == b[j - 1] {
                table[i - 1][j - 1] + 1
            } else {
                table[i - 1][j].max(table[i][j - 1])
            };
        }
    }
    table
}

/// ROUGE-L over the full token sequences.
pub fn rouge_l(reference: &[String], candidate: &[String]) -> Score {
    if reference.is_empty() || candidate.is_empty() {
        return Score::default();
    }
    let lcs = lcs_table(reference, candidate)[reference.len()][candidate.len()];
    Score::from_counts(lcs, candidate.len(), reference.len())
}

/// Indices into `reference` that take part in one LCS with `candidate`.
fn lcs_indices(reference: &[String], candidate: &[String]) -> Vec<usize> {
    let table = lcs_table(reference, candidate);
    let (mut i, mut j) = (reference.len(), candidate.len());
    let mut indices = Vec::new();
    while i > 0 && j > 0 {
        if reference[i - 1] == candidate[j - 1] {
            indices.push(i - 1);
            i -= 1;
            j -= 1;
        } else if table[i - 1][j] > table[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    indices.reverse();
    indices
}

/// Summary-level ROUGE-L: sentences split on newlines, union-LCS per
/// reference sentence, hits clipped by token counts on both sides.
pub fn rouge_lsum(reference: &str, candidate: &str) -> Score {
    let ref_sents = sentences(reference);
    let cand_sents = sentences(candidate);
    let ref_total: usize = ref_sents.iter().map(Vec::len).sum();
    let cand_total: usize = cand_sents.iter().map(Vec::len).sum();
    if ref_total == 0 || cand_total == 0 {
        return Score::default();
    }

    let mut ref_left: HashMap<&str, usize> = HashMap::new();
    let mut cand_left: HashMap<&str, usize> = HashMap::new();
    for token in ref_sents.iter().flatten() {
        *ref_left.entry(token.as_str()).or_insert(0) += 1;
    }
    for token in cand_sents.iter().flatten() {
        *cand_left.entry(token.as_str()).or_insert(0) += 1;
    }

    let mut hits = 0;
    for ref_sent in &ref_sents {
        let mut union: Vec<usize> = cand_sents
            .iter()
            .flat_map(|cand| lcs_indices(ref_sent, cand))
            .collect();
        union.sort_unstable();
        union.dedup();
        for idx in union {
            let token = ref_sent[idx].as_str();
            let (Some(r), Some(c)) = (ref_left.get_mut(token), cand_left.get_mut(token)) else {
                continue;
            };
            if *r > 0 && *c > 0 {
                *r -= 1;
                *c -= 1;
                hits += 1;
            }
        }
    }
    Score::from_counts(hits, cand_total, ref_total)
}

fn sentences(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .map(tokenize)
        .filter(|tokens| !tokens.is_empty())
        .collect()
}

/// All ROUGE variants for one (reference, candidate) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PairScores {
    pub rouge1: Score,
    pub rouge2: Score,
    pub rouge_l: Score,
    pub rouge_lsum: Score,
}

pub fn score_pair(reference: &str, candidate: &str) -> PairScores {
    let ref_tokens = tokenize(reference);
    let cand_tokens = tokenize(candidate);
    PairScores {
        rouge1: rouge_n(&ref_tokens, &cand_tokens, 1),
        rouge2: rouge_n(&ref_tokens, &cand_tokens, 2),
        rouge_l: rouge_l(&ref_tokens, &cand_tokens),
        rouge_lsum: rouge_lsum(reference, candidate),
    }
}
