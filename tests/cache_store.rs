use llm_summary_eval::{
    data::cache::{self, CacheEntries, SummaryCache},
    error::StorageError,
};

#[test]
fn missing_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let entries = cache::load(&dir.path().join("absent.json")).unwrap();
    assert!(entries.is_empty());
}

#[test]
fn corrupt_file_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    for body in ["{not json", "[1, 2, 3]", r#"{"article": 7}"#, ""] {
        std::fs::write(&path, body).unwrap();
        let err = cache::load(&path).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }), "{body:?} -> {err}");
    }
}

#[test]
fn saved_entries_reload_in_insertion_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    let mut cache = SummaryCache::load(&path).unwrap();
    cache.insert("zeta article", "z");
    cache.insert("alpha article", "a");
    cache.insert_and_save("middle article", "m").unwrap();

    let reloaded = cache::load(&path).unwrap();
    let keys: Vec<&str> = reloaded.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["zeta article", "alpha article", "middle article"]);
}

#[test]
fn keys_are_exact_article_text() {
    let mut cache_entries = CacheEntries::new();
    cache_entries.insert("The cat.".into(), "s1".into());
    cache_entries.insert("The cat. ".into(), "s2".into());
    cache_entries.insert("the cat.".into(), "s3".into());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    cache::save(&path, &cache_entries).unwrap();

    let cache = SummaryCache::load(&path).unwrap();
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.get("The cat."), Some("s1"));
    assert_eq!(cache.get("The cat. "), Some("s2"));
    assert_eq!(cache.get("the cat."), Some("s3"));
    assert_eq!(cache.get("The cat"), None);
}

#[test]
fn last_write_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    let mut cache = SummaryCache::load(&path).unwrap();
    cache.insert_and_save("article", "first").unwrap();
    cache.insert_and_save("article", "second").unwrap();

    let reloaded = SummaryCache::load(&path).unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.get("article"), Some("second"));
}

#[test]
fn save_replaces_file_without_leftovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    let mut cache = SummaryCache::load(&path).unwrap();
    for i in 0..5 {
        cache.insert_and_save(format!("article {i}"), format!("summary {i}")).unwrap();
    }

    let files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(files, vec![std::ffi::OsString::from("cache.json")]);
    assert_eq!(SummaryCache::load(&path).unwrap().len(), 5);
}

#[test]
fn file_is_a_plain_json_object() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    let mut cache = SummaryCache::load(&path).unwrap();
    cache.insert_and_save("line one\nline \"two\"", "ok").unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value, serde_json::json!({ "line one\nline \"two\"": "ok" }));
}
