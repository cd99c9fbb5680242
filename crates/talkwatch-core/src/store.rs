//! Snapshot persistence.
//!
//! Keeps exactly one last-known-good snapshot on disk as a JSON document
//! with the same shape as the watched data file. Writes go through a temp
//! file and a rename so an interrupted cycle never leaves a truncated
//! state file behind.

use crate::Result;
use std::path::{Path, PathBuf};
use talkwatch_types::Schedule;
use tracing::debug;

/// File-backed store for the last-known-good snapshot.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Create a store at the given path, ensuring the parent directory
    /// exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted snapshot. `None` when nothing has been persisted
    /// yet (first run).
    pub fn load(&self) -> Result<Option<Schedule>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Persist the snapshot, atomically replacing the previous one.
    pub fn persist(&self, snapshot: &Schedule) -> Result<()> {
        let raw = serde_json::to_string(snapshot)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, raw)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(
            target: "talkwatch::store",
            path = %self.path.display(),
            date = %snapshot.date,
            "snapshot persisted"
        );
        Ok(())
    }
}
