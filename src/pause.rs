//! Timestamped marker telling the daemon to ignore focus changes.
//!
//! The cycle command touches the marker right before it asks Sway to move
//! focus. The daemon treats focus events as its own echo while the marker is
//! younger than [`PAUSE_MAX_AGE`]. Only the modification time matters.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::debug;

use crate::paths;

/// How long a raised marker suppresses tracking
pub const PAUSE_MAX_AGE: Duration = Duration::from_secs(2);

pub struct PauseSignal {
    path: PathBuf,
}

impl PauseSignal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PauseSignal { path: path.into() }
    }

    pub fn default_location() -> Self {
        Self::new(paths::pause_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Refresh the marker. Best effort: failures are logged and dropped.
    pub fn raise(&self) {
        if let Err(e) = fs::write(&self.path, b"pause") {
            debug!(path = %self.path.display(), error = %e, "Failed to raise pause marker");
        }
    }

    pub fn is_active(&self, max_age: Duration) -> bool {
        self.is_active_at(SystemTime::now(), max_age)
    }

    /// Whether the marker is at most `max_age` old as of `now`.
    ///
    /// Any I/O error counts as inactive so a broken marker never stops tracking.
    pub fn is_active_at(&self, now: SystemTime, max_age: Duration) -> bool {
        let modified = match fs::metadata(&self.path).and_then(|meta| meta.modified()) {
            Ok(modified) => modified,
            Err(_) => return false,
        };

        // A timestamp ahead of `now` means it was just written on a skewed clock
        let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
        age <= max_age
    }
}
