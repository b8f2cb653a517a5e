use std::{
    collections::HashMap,
    fs, io,
    path::PathBuf,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::Outcome;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("stored stats are malformed: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
}

/// Key-value persistence for the stats document.
pub trait StatsStore {
    fn load(&self, key: &str) -> Result<Option<String>, StatsError>;
    fn save(&mut self, key: &str, value: &str) -> Result<(), StatsError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }
}

impl StatsStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StatsError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StatsError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Keeps each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StatsStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StatsError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StatsError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

pub struct StatsTracker {
    stats: Stats,
    key: String,
    store: Box<dyn StatsStore>,
}

impl StatsTracker {
    /// Builds a tracker and restores its counters from `store`.
    pub fn new(store: Box<dyn StatsStore>, key: impl Into<String>) -> Self {
        let mut tracker = StatsTracker {
            stats: Stats::default(),
            key: key.into(),
            store,
        };
        tracker.load();
        tracker
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn record(&mut self, outcome: Outcome) {
        if outcome.is_win() {
            self.stats.wins = self.stats.wins.saturating_add(1);
        } else if outcome.is_loss() {
            self.stats.losses = self.stats.losses.saturating_add(1);
        }
    }

    /// Writes the counters out. A failure is logged and leaves the in-memory
    /// counters as they are.
    pub fn persist(&mut self) -> Result<(), StatsError> {
        let result = serde_json::to_string(&self.stats)
            .map_err(StatsError::from)
            .and_then(|json| self.store.save(&self.key, &json));
        if let Err(err) = &result {
            log::warn!("failed to save stats: {err}");
        }
        result
    }

    /// Restores the counters. Absent or unreadable data leaves both at zero.
    pub fn load(&mut self) -> Stats {
        self.stats = match self.read() {
            Ok(Some(stats)) => stats,
            Ok(None) => Stats::default(),
            Err(err) => {
                log::warn!("failed to load stats: {err}");
                Stats::default()
            }
        };
        self.stats
    }

    fn read(&self) -> Result<Option<Stats>, StatsError> {
        match self.store.load(&self.key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}
