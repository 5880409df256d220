//! Durable client-side key/value storage
//!
//! The site persists exactly one value: the best time of the hidden-fire
//! minigame. `RecordStore` abstracts the backing store (browser
//! `localStorage`, a JSON file on native targets, memory in tests).

use crate::error::{CyfralError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Storage key of the minigame best time
pub const BEST_RECORD_KEY: &str = "lc-fire-record";

/// String key/value store
pub trait RecordStore {
    /// Read a value, `None` when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Volatile store
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    values: BTreeMap<String, String>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a single JSON object on disk
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    path: PathBuf,
}

impl FileRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl RecordStore for FileRecordStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&values)?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), key, "Record written");
        Ok(())
    }
}

/// Best (lowest) completion time of the minigame, in seconds
pub struct BestRecord<S: RecordStore> {
    store: S,
    best: Option<f64>,
}

impl<S: RecordStore> BestRecord<S> {
    /// Read the stored record at startup
    ///
    /// A missing, unreadable or malformed value reads as "no record yet".
    pub fn load(store: S) -> Self {
        let best = match store.get(BEST_RECORD_KEY) {
            Ok(Some(raw)) => parse_record(&raw),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read best record");
                None
            }
        };

        Self { store, best }
    }

    /// Current best time
    pub fn best(&self) -> Option<f64> {
        self.best
    }

    /// Register a finished run, persisting it when it beats the record
    ///
    /// Returns the best time after the run.
    pub fn record_time(&mut self, elapsed_secs: f64) -> Result<f64> {
        if !elapsed_secs.is_finite() || elapsed_secs < 0.0 {
            return Err(CyfralError::invalid_input(format!(
                "elapsed time must be a non-negative number, got {elapsed_secs}"
            )));
        }

        let best = match self.best {
            Some(prev) => prev.min(elapsed_secs),
            None => elapsed_secs,
        };

        self.store.set(BEST_RECORD_KEY, &best.to_string())?;
        self.best = Some(best);
        Ok(best)
    }

    /// Give the store back
    pub fn into_store(self) -> S {
        self.store
    }
}

fn parse_record(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}
