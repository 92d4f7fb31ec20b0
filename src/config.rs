use std::path::Path;

use log::warn;

use crate::ai::SearchConfig;
use crate::error::ConfigError;
use crate::session::SessionConfig;

/// Largest board the configuration accepts.
pub const MAX_BOARD_SIZE: usize = 16;

/// Board settings.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub size: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig { size: 6 }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardConfig,
    pub search: SearchConfig,
    pub game: SessionConfig,
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
            warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let size = self.board.size;
        if !(2..=MAX_BOARD_SIZE).contains(&size) {
            return Err(ConfigError::Validation(format!(
                "board.size must be in 2..={MAX_BOARD_SIZE}"
            )));
        }
        if self.search.depth == 0 {
            return Err(ConfigError::Validation(
                "search.depth must be >= 1".into(),
            ));
        }
        // Material scores range over +-size^2; a win has to beat all of them.
        if self.search.winning_value <= (size * size) as i32 {
            return Err(ConfigError::Validation(
                "search.winning_value must exceed board.size squared".into(),
            ));
        }
        if self.game.max_moves == 0 {
            return Err(ConfigError::Validation(
                "game.max_moves must be > 0".into(),
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
