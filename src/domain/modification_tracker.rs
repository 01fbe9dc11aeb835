use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::domain::graph::canonical::{canonical_string, snapshot_from_content};
use crate::domain::graph::snapshot::GraphSnapshot;
use crate::domain::utils::id::FileId;
use crate::error::Result;

/// Decides whether a graph differs from persisted content.
///
/// Missing content compares as the empty graph, so an empty in-memory graph with
/// nothing persisted is clean and any non-empty one is dirty.
pub fn is_modified(current: &GraphSnapshot, persisted: Option<&Value>) -> Result<bool> {
    let baseline = canonical_string(&snapshot_from_content(persisted))?;
    Ok(canonical_string(current)? != baseline)
}

/// Per-file dirty flags against a cached canonical form of the last persisted content.
#[derive(Debug, Default)]
pub struct ModificationTracker {
    baselines: HashMap<FileId, String>,
    dirty: HashMap<FileId, bool>,
}

impl ModificationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records what is currently persisted for `file_id`.
    pub fn set_baseline(&mut self, file_id: &FileId, persisted: Option<&Value>) -> Result<()> {
        let baseline = canonical_string(&snapshot_from_content(persisted))?;
        self.baselines.insert(file_id.clone(), baseline);
        Ok(())
    }

    pub fn has_baseline(&self, file_id: &FileId) -> bool {
        self.baselines.contains_key(file_id)
    }

    /// Compares `current` against the baseline and stores the result.
    pub fn evaluate(&mut self, file_id: &FileId, current: &GraphSnapshot) -> Result<bool> {
        let current = canonical_string(current)?;
        let dirty = match self.baselines.get(file_id) {
            Some(baseline) => &current != baseline,
            None => current != canonical_string(&GraphSnapshot::default())?,
        };

        if self.dirty.insert(file_id.clone(), dirty) != Some(dirty) {
            log::debug!("{:?} is now {}.", file_id, if dirty { "modified" } else { "clean" });
        }
        Ok(dirty)
    }

    pub fn is_dirty(&self, file_id: &FileId) -> bool {
        self.dirty.get(file_id).copied().unwrap_or(false)
    }

    pub fn forget(&mut self, file_id: &FileId) {
        self.baselines.remove(file_id);
        self.dirty.remove(file_id);
    }

    /// Files with a baseline, a dirty flag, or both.
    pub fn tracked_files(&self) -> usize {
        self.baselines.keys().chain(self.dirty.keys()).collect::<HashSet<_>>().len()
    }
}
