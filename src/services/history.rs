//! Client-local generation history.
//!
//! An explicit store object rather than ambient global storage: hydrate
//! once with [`HistoryStore::load`], mutate through
//! [`HistoryStore::append`], which truncates to capacity and persists the
//! whole list after every mutation.

use crate::models::HistoryEntry;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maximum number of retained entries; oldest are evicted on overflow.
pub const HISTORY_CAPACITY: usize = 15;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("history serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Append-to-front, capped, file-backed history list, most-recent-first.
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Hydrate the store from its backing file. A missing file is an
    /// empty history, not an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, entries })
    }

    /// Prepend an entry, truncate to capacity, and persist.
    pub fn append(&mut self, mut entry: HistoryEntry) -> Result<(), HistoryError> {
        // Timestamp ids can collide within a millisecond; bump until unique.
        while self.entries.iter().any(|e| e.id == entry.id) {
            entry.id = match entry.id.parse::<i64>() {
                Ok(n) => (n + 1).to_string(),
                Err(_) => format!("{}-1", entry.id),
            };
        }

        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_CAPACITY);
        self.persist()
    }

    /// All retained entries, most recent first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.entries)?;

        // Write-then-rename: a crash mid-write must not leave a truncated
        // file behind for the next load.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GenerationRequest, GenerationResult};
    use tempfile::tempdir;

    fn entry(prompt: &str) -> HistoryEntry {
        HistoryEntry::new(
            GenerationResult::new("QUJD".to_string(), prompt.to_string()),
            GenerationRequest::new(prompt),
        )
    }

    #[test]
    fn missing_file_hydrates_empty() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::load(dir.path().join("history.json")).unwrap();
        assert!(store.entries().is_empty());
    }

    #[test]
    fn append_prepends_most_recent_first() {
        let dir = tempdir().unwrap();
        let mut store = HistoryStore::load(dir.path().join("history.json")).unwrap();

        store.append(entry("first")).unwrap();
        store.append(entry("second")).unwrap();

        assert_eq!(store.entries()[0].request.prompt, "second");
        assert_eq!(store.entries()[1].request.prompt, "first");
    }

    #[test]
    fn history_never_exceeds_capacity_and_evicts_oldest() {
        let dir = tempdir().unwrap();
        let mut store = HistoryStore::load(dir.path().join("history.json")).unwrap();

        store.append(entry("prompt-0")).unwrap();
        let first_id = store.entries()[0].id.clone();

        for i in 1..16 {
            store.append(entry(&format!("prompt-{}", i))).unwrap();
        }

        assert_eq!(store.entries().len(), HISTORY_CAPACITY);
        assert!(store.entries().iter().all(|e| e.id != first_id));
        assert_eq!(store.entries()[0].request.prompt, "prompt-15");
    }

    #[test]
    fn entries_survive_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut store = HistoryStore::load(&path).unwrap();
        store.append(entry("persisted")).unwrap();
        drop(store);

        let reloaded = HistoryStore::load(&path).unwrap();
        assert_eq!(reloaded.entries().len(), 1);
        assert_eq!(reloaded.entries()[0].request.prompt, "persisted");
    }

    #[test]
    fn persist_replaces_the_file_and_leaves_no_temp_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut store = HistoryStore::load(&path).unwrap();
        store.append(entry("a")).unwrap();
        store.append(entry("b")).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let reloaded = HistoryStore::load(&path).unwrap();
        assert_eq!(reloaded.entries().len(), 2);
    }

    #[test]
    fn colliding_ids_are_bumped_until_unique() {
        let dir = tempdir().unwrap();
        let mut store = HistoryStore::load(dir.path().join("history.json")).unwrap();

        let mut a = entry("a");
        let mut b = entry("b");
        a.id = "1000".to_string();
        b.id = "1000".to_string();

        store.append(a).unwrap();
        store.append(b).unwrap();

        let ids: Vec<_> = store.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1001", "1000"]);
    }
}
