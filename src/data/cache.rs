//! Persistent article → summary cache backed by a single JSON object on disk.
//!
//! Keys are the exact article text. Nothing is normalised, hashed or
//! truncated, so two articles differing by one character are distinct
//! entries. Every save replaces the file through a temp file in the same
//! directory followed by a rename; a crash mid-write leaves the previous
//! file intact.

use std::{
    fs,
    io::{BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::StorageError;

/// In-memory form of the cache file. Insertion order is kept so the file
/// stays readable in processing order.
pub type CacheEntries = IndexMap<String, String>;

/// Read the persisted mapping, or an empty one if no file exists yet.
///
/// A file that exists but does not parse as a JSON object of strings is an
/// error; it is never replaced by an empty cache.
pub fn load(path: &Path) -> Result<CacheEntries, StorageError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "no cache file yet; starting empty");
            return Ok(CacheEntries::new());
        }
        Err(source) => {
            return Err(StorageError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace the persisted mapping with `entries`.
pub fn save(path: &Path, entries: &CacheEntries) -> Result<(), StorageError> {
    let write_err = |source: std::io::Error| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(write_err)?;

    let tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer(&mut writer, entries).map_err(|err| write_err(err.into()))?;
        writer.flush().map_err(write_err)?;
    }
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|err| write_err(err.error))?;
    debug!(path = %path.display(), entries = entries.len(), "persisted cache");
    Ok(())
}

/// Cache store owned by a single pipeline run.
#[derive(Debug)]
pub struct SummaryCache {
    path: PathBuf,
    entries: CacheEntries,
}

impl SummaryCache {
    /// Load the cache at `path`; missing files yield an empty cache.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = load(&path)?;
        info!(path = %path.display(), entries = entries.len(), "loaded summary cache");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, article: &str) -> Option<&str> {
        self.entries.get(article).map(String::as_str)
    }

    pub fn contains(&self, article: &str) -> bool {
        self.entries.contains_key(article)
    }

    /// Insert or overwrite an entry in memory. Last write wins.
    pub fn insert(&mut self, article: impl Into<String>, summary: impl Into<String>) {
        self.entries.insert(article.into(), summary.into());
    }

    /// Insert an entry and persist the whole cache immediately.
    pub fn insert_and_save(
        &mut self,
        article: impl Into<String>,
        summary: impl Into<String>,
    ) -> Result<(), StorageError> {
        self.insert(article, summary);
        self.save()
    }

    pub fn save(&self) -> Result<(), StorageError> {
        save(&self.path, &self.entries)
    }

    pub fn entries(&self) -> &CacheEntries {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries holding an empty summary (failed or blank generations).
    pub fn empty_count(&self) -> usize {
        self.entries.values().filter(|v| v.is_empty()).count()
    }

    /// Drop entries with empty summaries, returning how many were removed.
    pub fn prune_empty(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, summary| !summary.is_empty());
        before - self.entries.len()
    }
}
