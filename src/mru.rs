use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Upper bound on tracked windows; the oldest entries fall off past this
pub const MAX_ENTRIES: usize = 512;

/// Window container ids ordered most-recently-focused first.
///
/// Serializes as a bare JSON array so the state file stays `[3,1,2]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecencyList(Vec<i64>);

impl RecencyList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from possibly untrusted ids, keeping the first occurrence
    /// of each and dropping anything past [`MAX_ENTRIES`].
    pub fn from_ids(ids: impl IntoIterator<Item = i64>) -> Self {
        let mut seen = HashSet::new();
        let ids = ids
            .into_iter()
            .filter(|id| seen.insert(*id))
            .take(MAX_ENTRIES)
            .collect();
        RecencyList(ids)
    }

    /// Move `id` to the front.
    ///
    /// Returns false if `id` was already the most recent entry.
    pub fn focus(&mut self, id: i64) -> bool {
        if self.0.first() == Some(&id) {
            return false;
        }

        if let Some(pos) = self.0.iter().position(|&existing| existing == id) {
            self.0.remove(pos);
        }
        self.0.insert(0, id);
        self.0.truncate(MAX_ENTRIES);
        true
    }

    pub fn ids(&self) -> &[i64] {
        &self.0
    }

    pub fn contains(&self, id: i64) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
