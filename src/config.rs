//! Startup settings
//!
//! `GameConfig` is read from a JSON file next to the save directory. Every
//! field has a default, so a partial file only overrides what it names and a
//! missing file means "all defaults".

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub save_dir: PathBuf,
    pub key_bindings_path: PathBuf,
    pub maps_dir: PathBuf,
    /// Creature sprite sheets, one directory per sprite key
    pub sprites_dir: PathBuf,
    pub start_map: String,
    /// Player start in tile units
    pub start_x: f32,
    pub start_y: f32,
    pub save_slot: u8,
    pub cheat_mode: bool,
}

/// Per-user data directory, or `./tile_rpg` when the platform has none
pub fn data_root() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("tile_rpg"))
        .unwrap_or_else(|| PathBuf::from("./tile_rpg"))
}

impl Default for GameConfig {
    fn default() -> Self {
        let root = data_root();
        GameConfig {
            save_dir: root.join("saves"),
            key_bindings_path: root.join("keybindings.json"),
            maps_dir: PathBuf::from("maps"),
            sprites_dir: PathBuf::from("assets/sprites"),
            start_map: "forest".to_string(),
            start_x: 5.0,
            start_y: 5.0,
            save_slot: 1,
            cheat_mode: false,
        }
    }
}

impl GameConfig {
    pub fn default_path() -> PathBuf {
        data_root().join("config.json")
    }

    /// Reads the config file
    ///
    /// A missing file yields the defaults with a warning. A file that exists
    /// but cannot be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(GameConfig::default());
        }

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), start_map = %config.start_map, "Config loaded");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = GameConfig::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_partial_file_overrides_named_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"start_map": "cave", "cheat_mode": true}"#).unwrap();

        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.start_map, "cave");
        assert!(config.cheat_mode);
        assert_eq!(config.save_slot, 1);
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(GameConfig::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = GameConfig {
            maps_dir: dir.path().join("maps"),
            save_slot: 3,
            ..GameConfig::default()
        };

        config.save(&path).unwrap();
        assert_eq!(GameConfig::load(&path).unwrap(), config);
    }
}
