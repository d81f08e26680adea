use llm_summary_eval::{
    data::{load_records, Record},
    error::DatasetError,
};

#[test]
fn csv_sample_is_a_contiguous_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.csv");
    std::fs::write(
        &path,
        "id,article,highlights\n1,\"First, with comma\",one\n2,Second,two\n3,Third,three\n",
    )
    .unwrap();

    let records = load_records(&path, 2).unwrap();
    assert_eq!(
        records,
        vec![
            Record::new("First, with comma", "one"),
            Record::new("Second", "two")
        ]
    );
    assert_eq!(load_records(&path, 10).unwrap().len(), 3);
    assert!(load_records(&path, 0).unwrap().is_empty());
}

#[test]
fn json_lines_accept_reference_aliases() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.jsonl");
    std::fs::write(
        &path,
        "{\"article\":\"a1\",\"highlights\":\"h1\"}\n\n{\"article\":\"a2\",\"reference\":\"h2\"}\n",
    )
    .unwrap();

    let records = load_records(&path, 5).unwrap();
    assert_eq!(records, vec![Record::new("a1", "h1"), Record::new("a2", "h2")]);
}

#[test]
fn csv_without_reference_column_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.csv");
    std::fs::write(&path, "article,other\nx,y\n").unwrap();

    let err = load_records(&path, 5).unwrap_err();
    assert!(matches!(err, DatasetError::MissingField { field: "highlights", .. }));
}

#[test]
fn missing_dataset_is_an_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_records(&dir.path().join("nope.csv"), 5).unwrap_err();
    assert!(matches!(err, DatasetError::Open { .. }));
}

#[test]
fn oversized_sample_returns_every_row() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("test.csv");
    std::fs::write(&csv, "article,highlights\na1,h1\na2,h2\n").unwrap();
    let jsonl = dir.path().join("test.jsonl");
    std::fs::write(
        &jsonl,
        "{\"article\":\"a1\",\"highlights\":\"h1\"}\n{\"article\":\"a2\",\"highlights\":\"h2\"}\n",
    )
    .unwrap();

    let expected = vec![Record::new("a1", "h1"), Record::new("a2", "h2")];
    assert_eq!(load_records(&csv, usize::MAX).unwrap(), expected);
    assert_eq!(load_records(&jsonl, usize::MAX).unwrap(), expected);
}

#[test]
fn both_formats_prefer_the_same_column_when_aliases_collide() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("test.csv");
    std::fs::write(&csv, "text,article,summary,highlights\nt,a,s,h\n").unwrap();
    let jsonl = dir.path().join("test.jsonl");
    std::fs::write(
        &jsonl,
        "{\"text\":\"t\",\"article\":\"a\",\"summary\":\"s\",\"highlights\":\"h\"}\n",
    )
    .unwrap();

    let expected = vec![Record::new("a", "h")];
    assert_eq!(load_records(&csv, 5).unwrap(), expected);
    assert_eq!(load_records(&jsonl, 5).unwrap(), expected);
}

#[test]
fn json_lines_without_article_field_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.jsonl");
    std::fs::write(&path, "{\"body\":\"x\",\"highlights\":\"h\"}\n").unwrap();

    let err = load_records(&path, 5).unwrap_err();
    assert!(matches!(err, DatasetError::MissingField { field: "article", .. }));
}
