//! Enrichment cache.
//!
//! Provider results are kept per category in a [`RecordStore`] so repeated
//! runs only query what is still missing. [`JsonFileStore`] persists to a
//! pretty-printed JSON object with sorted keys; [`MemoryStore`] backs tests.

mod records;

pub use records::{MovieRecord, ShowRecord};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::persist::write_json_atomic;

/// Key/value repository for cached records.
pub trait RecordStore<R> {
    /// Look up a record by key.
    fn get(&self, key: &str) -> Option<R>;

    /// Insert or replace a record.
    fn put(&mut self, key: &str, record: R);

    /// Persist the current contents.
    fn flush(&mut self) -> Result<()>;

    /// Number of stored records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// JSON-file backed store.
///
/// The whole file is rewritten on every [`flush`](RecordStore::flush).
#[derive(Debug)]
pub struct JsonFileStore<R> {
    path: PathBuf,
    entries: BTreeMap<String, R>,
}

impl<R> JsonFileStore<R>
where
    R: Serialize + DeserializeOwned + Clone,
{
    /// Open the store at `path`.
    ///
    /// A missing file starts empty. An unreadable or corrupt file also starts
    /// empty, with a warning; it is replaced on the next flush. Individual
    /// entries that fail to decode are dropped.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        debug!(path = ?path, entries = entries.len(), "Opened cache");
        Self { path, entries }
    }
}

fn load_entries<R: DeserializeOwned>(path: &Path) -> BTreeMap<String, R> {
    if !path.exists() {
        return BTreeMap::new();
    }

    let raw: BTreeMap<String, serde_json::Value> = match std::fs::read_to_string(path)
        .map_err(anyhow::Error::from)
        .and_then(|text| serde_json::from_str(&text).map_err(anyhow::Error::from))
    {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = ?path, error = %e, "Cache file unreadable; starting empty");
            return BTreeMap::new();
        }
    };

    raw.into_iter()
        .filter_map(|(key, value)| match serde_json::from_value(value) {
            Ok(record) => Some((key, record)),
            Err(e) => {
                warn!(path = ?path, key = %key, error = %e, "Dropping undecodable cache entry");
                None
            }
        })
        .collect()
}

impl<R> RecordStore<R> for JsonFileStore<R>
where
    R: Serialize + DeserializeOwned + Clone,
{
    fn get(&self, key: &str) -> Option<R> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, record: R) {
        self.entries.insert(key.to_string(), record);
    }

    fn flush(&mut self) -> Result<()> {
        write_json_atomic(&self.path, &self.entries)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// In-memory store. Counts flushes so callers can assert persistence cadence.
#[derive(Debug, Default)]
pub struct MemoryStore<R> {
    entries: BTreeMap<String, R>,
    flushes: usize,
}

impl<R> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            flushes: 0,
        }
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl<R: Clone> RecordStore<R> for MemoryStore<R> {
    fn get(&self, key: &str) -> Option<R> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, record: R) {
        self.entries.insert(key.to_string(), record);
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Cache key for a movie-like entry: `"<title>|<year>"`, with a missing year
/// rendered as `None`.
pub fn movie_key(title: &str, year: Option<u16>) -> String {
    match year {
        Some(y) => format!("{title}|{y}"),
        None => format!("{title}|None"),
    }
}

/// Cache key for a show: the lower-cased title.
pub fn show_key(title: &str) -> String {
    title.to_lowercase()
}

/// Cache key for an episode title lookup.
pub fn episode_key(tv_id: u64, season: u32, episode: u32) -> String {
    format!("{tv_id}|{season}|{episode}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys() {
        assert_eq!(movie_key("Heat", Some(1995)), "Heat|1995");
        assert_eq!(movie_key("Free Solo", None), "Free Solo|None");
        assert_eq!(show_key("The Office"), "the office");
        assert_eq!(episode_key(1399, 1, 2), "1399|1|2");
    }

    #[test]
    fn test_json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tmdb_movies_cache.json");

        let mut store: JsonFileStore<MovieRecord> = JsonFileStore::open(&path);
        assert!(store.is_empty());
        store.put(
            "Heat|1995",
            MovieRecord {
                movie_id: Some(949),
                ..Default::default()
            },
        );
        store.flush().unwrap();

        let reopened: JsonFileStore<MovieRecord> = JsonFileStore::open(&path);
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.get("Heat|1995").unwrap().movie_id, Some(949));
    }

    #[test]
    fn test_flush_is_byte_stable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut store: JsonFileStore<String> = JsonFileStore::open(&path);
        store.put("b|1|1", "Pilot".into());
        store.put("a|1|1", String::new());
        store.flush().unwrap();
        let first = std::fs::read(&path).unwrap();

        let mut again: JsonFileStore<String> = JsonFileStore::open(&path);
        again.flush().unwrap();
        assert_eq!(first, std::fs::read(&path).unwrap());

        let text = String::from_utf8(first).unwrap();
        assert!(text.find("a|1|1").unwrap() < text.find("b|1|1").unwrap());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store: JsonFileStore<MovieRecord> = JsonFileStore::open(&path);
        assert!(store.is_empty());
    }

    #[test]
    fn test_bad_entry_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(
            &path,
            r#"{"Good|2000": {"movie_id": 1}, "Bad|2001": {"movie_id": "oops"}}"#,
        )
        .unwrap();

        let store: JsonFileStore<MovieRecord> = JsonFileStore::open(&path);
        assert_eq!(store.len(), 1);
        assert!(store.get("Good|2000").is_some());
    }

    #[test]
    fn test_memory_store_counts_flushes() {
        let mut store: MemoryStore<String> = MemoryStore::new();
        store.put("k", "v".into());
        store.flush().unwrap();
        store.flush().unwrap();
        assert_eq!(store.flush_count(), 2);
        assert_eq!(store.get("k").as_deref(), Some("v"));
    }
}
