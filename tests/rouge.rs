use llm_summary_eval::{
    error::EvalError,
    eval::{self, rouge},
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn identical_pair_scores_one() {
    let report = eval::evaluate(&["A B"], &["A B"]).unwrap();
    for metric in ["rouge1", "rouge2", "rougeL", "rougeLsum"] {
        assert_eq!(report.get(metric), Some(1.0), "{metric}");
    }
}

#[test]
fn unequal_lengths_are_rejected() {
    let err = eval::evaluate(&["one", "two"], &["one"]).unwrap_err();
    assert_eq!(
        err,
        EvalError::InputLengthMismatch {
            generated: 2,
            references: 1
        }
    );
}

#[test]
fn partial_overlap_matches_hand_computation() {
    // reference: the cat sat on the mat (6 tokens)
    // candidate: the cat is on the mat today (7 tokens)
    let scores = rouge::score_pair("The cat sat on the mat.", "The cat is on the mat today");

    // unigram hits: the x2, cat, on, mat = 5
    assert!(close(scores.rouge1.precision, 5.0 / 7.0));
    assert!(close(scores.rouge1.recall, 5.0 / 6.0));

    // bigram hits: "the cat", "on the", "the mat" = 3 of 5 / 6
    assert!(close(scores.rouge2.recall, 3.0 / 5.0));
    assert!(close(scores.rouge2.precision, 3.0 / 6.0));

    // LCS: the cat on the mat = 5
    assert!(close(scores.rouge_l.recall, 5.0 / 6.0));
    assert!(close(scores.rouge_l.precision, 5.0 / 7.0));
}

#[test]
fn empty_generation_scores_zero() {
    let scores = rouge::score_pair("reference text", "");
    assert_eq!(scores.rouge1.fmeasure, 0.0);
    assert_eq!(scores.rouge_l.fmeasure, 0.0);
    assert_eq!(scores.rouge_lsum.fmeasure, 0.0);
}

#[test]
fn report_averages_over_pairs() {
    let report = eval::evaluate(&["a b", "x y"], &["a b", "c d"]).unwrap();
    assert!(close(report.get("rouge1").unwrap(), 0.5));
    assert!(close(report.get("rouge1_precision").unwrap(), 0.5));
    assert!(close(report.get("rouge1_recall").unwrap(), 0.5));
}

#[test]
fn empty_collection_reports_zeros() {
    let none: [&str; 0] = [];
    let report = eval::evaluate(&none, &none).unwrap();
    assert_eq!(report.len(), 12);
    assert!(report.iter().all(|(_, v)| v == 0.0));
}

#[test]
fn lsum_uses_sentence_union() {
    let reference = "police killed the gunman\nthe gunman was shot";
    let candidate = "police kill the gunman\nthe gunman was shot dead";
    let scores = rouge::score_pair(reference, candidate);
    // reference tokens: 8, candidate tokens: 9, union-LCS hits: police the gunman the gunman was shot = 7
    assert!(close(scores.rouge_lsum.recall, 7.0 / 8.0));
    assert!(close(scores.rouge_lsum.precision, 7.0 / 9.0));
}
