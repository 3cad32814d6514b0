//! Analysis snapshot history.
//!
//! A bounded, newest-first list of past analyses persisted through an
//! injected `SnapshotStore`. Stored data that cannot be read or parsed loads
//! as an empty history. Writers are not coordinated: the last write wins.

use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::analysis::models::{AnalysisResult, Candidate, Improvement, Score};

pub const HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// "Version N", N being the history length before this snapshot plus one.
    pub label: String,
    pub score: Score,
    #[serde(default)]
    pub candidate: Candidate,
    #[serde(default)]
    pub improvements: Vec<Improvement>,
    #[serde(default)]
    pub strengths: Vec<String>,
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to access snapshot storage: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to encode snapshot history: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Raw persistence for the serialized history.
pub trait SnapshotStore {
    /// `Ok(None)` when nothing has been stored yet.
    fn read(&self) -> io::Result<Option<String>>;
    fn write(&self, data: &str) -> io::Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn with_contents(data: &str) -> Self {
        Self {
            data: Mutex::new(Some(data.to_string())),
        }
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self) -> io::Result<Option<String>> {
        self.data
            .lock()
            .map(|d| d.clone())
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "snapshot store lock poisoned"))
    }

    fn write(&self, data: &str) -> io::Result<()> {
        let mut guard = self
            .data
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "snapshot store lock poisoned"))?;
        *guard = Some(data.to_string());
        Ok(())
    }
}

/// History persisted as a JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn read(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, data: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, data)
    }
}

pub struct SnapshotHistory<S> {
    store: S,
    capacity: usize,
}

impl<S: SnapshotStore> SnapshotHistory<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            capacity: HISTORY_CAPACITY,
        }
    }

    /// Newest first. Never fails: unreadable data is treated as no history.
    pub fn load_history(&self) -> Vec<Snapshot> {
        let raw = match self.store.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Snapshot history unreadable, starting empty: {e}");
                return Vec::new();
            }
        };

        if raw.trim().is_empty() {
            return Vec::new();
        }

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Snapshot history corrupt, starting empty: {e}");
            Vec::new()
        })
    }

    /// Prepends a snapshot of `analysis` and evicts the oldest entries beyond
    /// capacity.
    pub fn save_snapshot(&self, analysis: &AnalysisResult) -> Result<Snapshot, HistoryError> {
        let mut history = self.load_history();

        let snapshot = Snapshot {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            label: format!("Version {}", history.len() + 1),
            score: analysis.score.clone(),
            candidate: analysis.candidate.clone(),
            improvements: analysis.improvements.clone(),
            strengths: analysis.strengths.clone(),
        };

        history.insert(0, snapshot.clone());
        history.truncate(self.capacity);
        self.persist(&history)?;

        debug!("Saved {} ({} in history)", snapshot.label, history.len());
        Ok(snapshot)
    }

    /// Returns whether a snapshot with `id` existed.
    pub fn remove(&self, id: Uuid) -> Result<bool, HistoryError> {
        let mut history = self.load_history();
        let before = history.len();
        history.retain(|s| s.id != id);
        if history.len() == before {
            return Ok(false);
        }
        self.persist(&history)?;
        Ok(true)
    }

    pub fn clear(&self) -> Result<(), HistoryError> {
        self.persist(&[])
    }

    fn persist(&self, history: &[Snapshot]) -> Result<(), HistoryError> {
        let data = serde_json::to_string(history)?;
        self.store.write(&data)?;
        Ok(())
    }
}
