use std::fs;
use std::path::{Path, PathBuf};

use super::GameSnapshot;
use crate::error::SnapshotError;
use crate::game::GameEngine;

/// Saves and loads a single game snapshot as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SnapshotStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write the game, replacing any previous save.
    pub fn save(&self, game: &GameEngine) -> Result<&Path, SnapshotError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&game.snapshot())?;

        // Atomic rename
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;

        tracing::info!(path = %self.path.display(), "game saved");
        Ok(&self.path)
    }

    /// Read the raw snapshot without validating it.
    pub fn read(&self) -> Result<GameSnapshot, SnapshotError> {
        let json = fs::read_to_string(&self.path).map_err(|e| SnapshotError::Read {
            path: self.path.clone(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| SnapshotError::Parse {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Read and validate the saved game.
    pub fn load(&self) -> Result<GameEngine, SnapshotError> {
        let game = self.read()?.restore()?;
        tracing::info!(path = %self.path.display(), "game loaded");
        Ok(game)
    }
}
