use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::town::TownSnapshot;

/// Writes a JSON snapshot of the town every `interval_days` days.
pub struct SnapshotWriter {
    dir: PathBuf,
    interval_days: u64,
}

impl SnapshotWriter {
    pub fn new(dir: impl AsRef<Path>, interval_days: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval_days,
        }
    }

    pub fn maybe_write(&self, snapshot: &TownSnapshot) -> Result<Option<PathBuf>> {
        if self.interval_days == 0 || snapshot.day % self.interval_days != 0 {
            return Ok(None);
        }
        let dir = self.dir.join(&snapshot.scenario);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create snapshot dir {}", dir.display()))?;
        let path = dir.join(format!("day_{:06}.json", snapshot.day));
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        Ok(Some(path))
    }
}
