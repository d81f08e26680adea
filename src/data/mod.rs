//! Dataset ingestion and the persistent summary cache.

pub mod cache;

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::error::DatasetError;

const ARTICLE_COLUMNS: &[&str] = &["article", "text", "document"];
const REFERENCE_COLUMNS: &[&str] = &["highlights", "reference", "summary"];

/// One (article, reference summary) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub article: String,
    pub reference: String,
}

impl Record {
    pub fn new(article: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            article: article.into(),
            reference: reference.into(),
        }
    }
}

/// Load the first `sample_size` records from a CSV or JSON Lines file.
///
/// Files ending in `.jsonl` or `.json` are read as one object per line,
/// anything else as CSV with a header row. Both formats resolve the article
/// and reference fields the same way: the first name in `ARTICLE_COLUMNS`
/// (resp. `REFERENCE_COLUMNS`) that is present wins.
pub fn load_records(path: &Path, sample_size: usize) -> Result<Vec<Record>, DatasetError> {
    let is_json_lines = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jsonl") || ext.eq_ignore_ascii_case("json"));

    let records = if is_json_lines {
        load_json_lines(path, sample_size)?
    } else {
        load_csv(path, sample_size)?
    };
    info!(path = %path.display(), count = records.len(), "loaded dataset sample");
    Ok(records)
}

fn load_csv(path: &Path, sample_size: usize) -> Result<Vec<Record>, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);
    let headers = reader
        .headers()
        .map_err(|err| parse_error(path, 0, err))?
        .clone();

    let article_idx = find_column(&headers, ARTICLE_COLUMNS).ok_or(DatasetError::MissingField {
        path: path.to_path_buf(),
        field: "article",
    })?;
    let reference_idx =
        find_column(&headers, REFERENCE_COLUMNS).ok_or(DatasetError::MissingField {
            path: path.to_path_buf(),
            field: "highlights",
        })?;

    let mut records = Vec::new();
    for (idx, row) in reader.records().take(sample_size).enumerate() {
        let row = row.map_err(|err| parse_error(path, idx + 1, err))?;
        let article = row.get(article_idx).unwrap_or_default();
        let reference = row.get(reference_idx).unwrap_or_default();
        records.push(Record::new(article, reference));
    }
    Ok(records)
}

fn load_json_lines(path: &Path, sample_size: usize) -> Result<Vec<Record>, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut records = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        if records.len() >= sample_size {
            break;
        }
        let line = line.map_err(|source| DatasetError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let object: Map<String, Value> =
            serde_json::from_str(&line).map_err(|err| parse_error(path, idx + 1, err))?;
        let article = find_field(path, idx + 1, &object, ARTICLE_COLUMNS, "article")?;
        let reference = find_field(path, idx + 1, &object, REFERENCE_COLUMNS, "highlights")?;
        records.push(Record::new(article, reference));
    }
    Ok(records)
}

fn find_field<'a>(
    path: &Path,
    record: usize,
    object: &'a Map<String, Value>,
    candidates: &[&str],
    field: &'static str,
) -> Result<&'a str, DatasetError> {
    let value = candidates
        .iter()
        .find_map(|name| {
            object
                .iter()
                .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        })
        .ok_or_else(|| DatasetError::MissingField {
            path: path.to_path_buf(),
            field,
        })?;
    value
        .as_str()
        .ok_or_else(|| parse_error(path, record, format!("field `{field}` is not a string")))
}

fn find_column(headers: &csv::StringRecord, candidates: &[&str]) -> Option<usize> {
    candidates.iter().find_map(|name| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    })
}

fn parse_error(path: &Path, record: usize, err: impl std::fmt::Display) -> DatasetError {
    DatasetError::Parse {
        path: path.to_path_buf(),
        record,
        message: err.to_string(),
    }
}
