use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const RECENT_SEARCHES_KEY: &str = "recent-searches";
pub const MAX_RECENT_SEARCHES: usize = 5;

/// String key-value persistence for client-side state.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Keeps all keys in one JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&text)
            .with_context(|| format!("{} is not a JSON object", self.path.display()))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let all = self.read_all()?;
        Ok(all.get(key).and_then(Value::as_str).map(str::to_string))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // A corrupt file is replaced rather than blocking writes forever.
        let mut all = self.read_all().unwrap_or_default();
        all.insert(key.to_string(), Value::String(value.to_string()));
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let text = serde_json::to_string_pretty(&Value::Object(all))?;
        fs::write(&self.path, text)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

/// Most-recent-first list of distinct search terms, at most [`MAX_RECENT_SEARCHES`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecentSearches {
    entries: Vec<String>,
}

impl RecentSearches {
    /// Reads the stored list. Missing or unreadable data yields an empty history.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let raw = match store.get(RECENT_SEARCHES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::default(),
            Err(e) => {
                warn!("Error reading recent searches: {:#}", e);
                return Self::default();
            }
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(mut entries) => {
                entries.truncate(MAX_RECENT_SEARCHES);
                Self { entries }
            }
            Err(e) => {
                warn!("Discarding corrupt recent searches: {}", e);
                Self::default()
            }
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Moves `term` to the front, evicting the oldest entry past the cap.
    /// Blank terms are ignored; returns whether the list changed.
    pub fn push(&mut self, term: &str) -> bool {
        if term.trim().is_empty() {
            return false;
        }
        self.entries.retain(|existing| existing != term);
        self.entries.insert(0, term.to_string());
        self.entries.truncate(MAX_RECENT_SEARCHES);
        true
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        let encoded = serde_json::to_string(&self.entries)?;
        store.set(RECENT_SEARCHES_KEY, &encoded)
    }
}
