//! Batch configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use delve_core::entity::PlayerClass;
use delve_core::explore::EngineConfig;
use delve_grid::GridPos;

use crate::error::PlaytestError;

/// Parameters of a playtest batch.
///
/// Every field has a default, so `{}` is a valid config file.
///
/// # Example
///
/// ```
/// use delve_playtest::PlaytestConfig;
///
/// let config = PlaytestConfig::from_json_str(r#"{"games": 10, "base_seed": 500}"#).unwrap();
/// assert_eq!(config.games, 10);
/// assert_eq!(config.seed_for(3), 503);
/// assert_eq!(config.width, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaytestConfig {
    /// Number of games to play
    pub games: usize,
    /// Seed of game 0; game `i` uses `base_seed + i`, wrapping
    pub base_seed: u32,
    /// A game still running after this many turns counts as a timeout
    pub max_turns: u64,
    /// Grid width in cells
    pub width: i32,
    /// Grid height in cells
    pub height: i32,
    /// Class every bot plays
    pub player_class: PlayerClass,
    /// Wall cells shared by every game
    pub walls: Vec<GridPos>,
}

impl Default for PlaytestConfig {
    fn default() -> Self {
        Self {
            games: 100,
            base_seed: 1,
            max_turns: 200,
            width: 30,
            height: 30,
            player_class: PlayerClass::default(),
            walls: Vec::new(),
        }
    }
}

impl PlaytestConfig {
    /// Parses a config from JSON text and validates it.
    ///
    /// # Errors
    ///
    /// [`PlaytestError::Parse`] for malformed JSON and
    /// [`PlaytestError::InvalidConfig`] if validation fails.
    pub fn from_json_str(json: &str) -> Result<Self, PlaytestError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON config file.
    ///
    /// # Errors
    ///
    /// [`PlaytestError::Io`] if the file cannot be read, otherwise as
    /// [`PlaytestConfig::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PlaytestError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PlaytestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks that the batch can run.
    ///
    /// # Errors
    ///
    /// [`PlaytestError::InvalidConfig`] for non-positive dimensions or a zero
    /// turn limit.
    pub fn validate(&self) -> Result<(), PlaytestError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(PlaytestError::InvalidConfig(format!(
                "grid must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if self.max_turns == 0 {
            return Err(PlaytestError::InvalidConfig("max_turns must be positive".to_string()));
        }
        Ok(())
    }

    /// Seed of game `index`.
    #[must_use]
    pub fn seed_for(&self, index: usize) -> u32 {
        // Seeds wrap around u32 by definition.
        #[allow(clippy::cast_possible_truncation)]
        let offset = index as u32;
        self.base_seed.wrapping_add(offset)
    }

    /// Engine parameters for one game.
    #[must_use]
    pub fn engine_config(&self, seed: u32) -> EngineConfig {
        EngineConfig {
            width: self.width,
            height: self.height,
            seed,
            player_class: self.player_class,
            walls: self.walls.clone(),
        }
    }
}
