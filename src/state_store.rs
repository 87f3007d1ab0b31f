//! On-disk persistence of the recency list.
//!
//! The file is a single JSON array of container ids, most recent first. The
//! daemon is the only writer; the cycle command reads it on every invocation.
//! Writes go to a sibling temp file that is renamed over the target, so a
//! concurrent reader sees either the old list or the new one.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::mru::RecencyList;
use crate::paths;

pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StateStore { path: path.into() }
    }

    /// Store at the standard runtime location
    pub fn default_location() -> Self {
        Self::new(paths::state_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the recency list. Never fails: anything unreadable yields an empty list.
    pub fn load(&self) -> RecencyList {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No recency state yet");
                return RecencyList::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read recency state");
                return RecencyList::new();
            }
        };

        let entries = match serde_json::from_slice::<Vec<Value>>(&data) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Discarding corrupt recency state");
                return RecencyList::new();
            }
        };

        match entries.iter().map(entry_to_id).collect::<Option<Vec<i64>>>() {
            Some(ids) => RecencyList::from_ids(ids),
            None => {
                warn!(path = %self.path.display(), "Discarding recency state with non-integer ids");
                RecencyList::new()
            }
        }
    }

    /// Atomically replace the stored list
    pub fn save(&self, mru: &RecencyList) -> Result<()> {
        let payload = serde_json::to_vec(mru).context("Failed to serialize recency list")?;

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, payload)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to move recency state into {}", self.path.display()))?;

        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

/// Accept ids written as integers, floats (truncated) or numeric strings
fn entry_to_id(entry: &Value) -> Option<i64> {
    match entry {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
