use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::game::{WinDetection, COLS, MAX_DIMENSION, MIN_DIMENSION, ROWS};

/// Board dimensions.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub height: usize,
    pub width: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            height: ROWS,
            width: COLS,
        }
    }
}

/// Display colors. The engine carries them but never interprets them.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlayersConfig {
    pub player1_color: String,
    pub player2_color: String,
}

impl Default for PlayersConfig {
    fn default() -> Self {
        PlayersConfig {
            player1_color: "red".to_string(),
            player2_color: "blue".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub win_detection: WinDetection,
}

/// Where the front end saves and resumes games.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub path: PathBuf,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        SnapshotConfig {
            path: PathBuf::from("connect_four_save.json"),
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardConfig,
    pub players: PlayersConfig,
    pub engine: EngineConfig,
    pub snapshot: SnapshotConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sides = [("height", self.board.height), ("width", self.board.width)];
        for (name, side) in sides {
            if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&side) {
                return Err(ConfigError::Validation(format!(
                    "board.{name} must be between {MIN_DIMENSION} and {MAX_DIMENSION}"
                )));
            }
        }
        if self.players.player1_color.trim().is_empty()
            || self.players.player2_color.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "player colors must not be empty".into(),
            ));
        }
        if self
            .players
            .player1_color
            .eq_ignore_ascii_case(&self.players.player2_color)
        {
            return Err(ConfigError::Validation(
                "players.player1_color and players.player2_color must differ".into(),
            ));
        }
        if self.snapshot.path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "snapshot.path must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
