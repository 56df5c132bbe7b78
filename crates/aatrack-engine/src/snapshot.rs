//! File-backed snapshot source.
//!
//! An external save reader writes the current [`WorldState`] as JSON. The
//! provider re-reads the file only when its modification time changes.

use aatrack_common::{TrackerError, TrackerResult};
use aatrack_core::{SnapshotProvider, WorldState};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Polls a JSON snapshot file.
#[derive(Debug, Clone)]
pub struct FileSnapshotProvider {
    path: PathBuf,
    last_modified: Option<SystemTime>,
}

impl FileSnapshotProvider {
    /// Creates a provider for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_modified: None,
        }
    }

    /// Snapshot file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotProvider for FileSnapshotProvider {
    fn poll(&mut self) -> TrackerResult<Option<WorldState>> {
        let modified = match fs::metadata(&self.path).and_then(|meta| meta.modified()) {
            Ok(modified) => modified,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if self.last_modified == Some(modified) {
            return Ok(None);
        }

        let text = fs::read_to_string(&self.path)?;
        let state: WorldState =
            serde_json::from_str(&text).map_err(|e| TrackerError::Serialization(e.to_string()))?;
        self.last_modified = Some(modified);
        debug!(
            players = state.players.len(),
            "Read snapshot from {}",
            self.path.display()
        );
        Ok(Some(state))
    }
}
