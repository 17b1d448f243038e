use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::state::Position;

/// Largest grid side accepted by [`GameConfig::validate`]
///
/// Keeps cell coordinates in `i32` and the drawn board (two columns per
/// cell plus borders) inside a `u16` terminal width.
pub const MAX_GRID_SIDE: usize = 255;

/// Configuration for the game
///
/// Every field has a default, so a JSON config file only needs the keys it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid in cells
    pub grid_width: usize,
    /// Height of the game grid in cells
    pub grid_height: usize,

    /// Ticks per second at the start of a game
    pub initial_speed: u32,
    /// Lowest speed the user ceiling can be set to
    pub min_speed: u32,
    /// Highest speed the user ceiling can be set to
    pub max_speed: u32,

    /// Points added per food eaten
    pub food_reward: u32,
    /// Every time the score crosses a multiple of this, speed goes up by one
    pub speed_milestone: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            initial_speed: 7,
            min_speed: 1,
            max_speed: 15,
            food_reward: 10,
            speed_milestone: 50,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Load a configuration from a JSON file, filling missing keys with defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config in {:?}", path))
    }

    /// Cell the snake starts on after every reset (grid centre)
    pub fn start_position(&self) -> Position {
        Position::new((self.grid_width / 2) as i32, (self.grid_height / 2) as i32)
    }

    /// Total number of cells on the board, `None` if it doesn't fit in `usize`
    pub fn cell_count(&self) -> Option<usize> {
        self.grid_width.checked_mul(self.grid_height)
    }

    /// Validate configuration parameters
    ///
    /// Returns `Err` with a message naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_width > MAX_GRID_SIDE || self.grid_height > MAX_GRID_SIDE {
            return Err(format!(
                "grid sides must be at most {}, got {}x{}",
                MAX_GRID_SIDE, self.grid_width, self.grid_height
            ));
        }

        if self.cell_count().is_none_or(|cells| cells < 2) {
            return Err(format!(
                "grid needs room for the snake and one food, got {}x{}",
                self.grid_width, self.grid_height
            ));
        }

        if self.min_speed == 0 {
            return Err("min_speed must be at least 1".to_string());
        }

        if self.min_speed > self.max_speed {
            return Err(format!(
                "min_speed ({}) cannot exceed max_speed ({})",
                self.min_speed, self.max_speed
            ));
        }

        if !(self.min_speed..=self.max_speed).contains(&self.initial_speed) {
            return Err(format!(
                "initial_speed must be in [{}, {}], got {}",
                self.min_speed, self.max_speed, self.initial_speed
            ));
        }

        if self.food_reward == 0 {
            return Err("food_reward must be at least 1".to_string());
        }

        if self.speed_milestone == 0 {
            return Err("speed_milestone must be at least 1".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 20);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.initial_speed, 7);
        assert_eq!(config.food_reward, 10);
        assert_eq!(config.speed_milestone, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_start_position_is_centre() {
        assert_eq!(GameConfig::default().start_position(), Position::new(10, 10));
        assert_eq!(GameConfig::new(15, 9).start_position(), Position::new(7, 4));
    }

    #[test]
    fn test_validate_rejects_bad_speeds() {
        let mut config = GameConfig::default();
        config.min_speed = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.min_speed = 12;
        config.max_speed = 10;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.initial_speed = 20;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_grid_and_zero_reward() {
        assert!(GameConfig::new(0, 10).validate().is_err());
        assert!(GameConfig::new(1, 1).validate().is_err());
        assert!(GameConfig::new(2, 1).validate().is_ok());

        let mut config = GameConfig::default();
        config.food_reward = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.speed_milestone = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_grid() {
        assert!(GameConfig::new(MAX_GRID_SIDE, MAX_GRID_SIDE).validate().is_ok());
        assert!(GameConfig::new(MAX_GRID_SIDE + 1, 20).validate().is_err());
        assert!(GameConfig::new(40000, 20).validate().is_err());
        assert!(GameConfig::new(20, usize::MAX).validate().is_err());
    }

    #[test]
    fn test_cell_count_overflow() {
        assert_eq!(GameConfig::new(3, 4).cell_count(), Some(12));
        assert_eq!(GameConfig::new(usize::MAX, 2).cell_count(), None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snake.json");
        std::fs::write(&path, r#"{ "grid_width": 30, "max_speed": 10 }"#).unwrap();

        let config = GameConfig::from_json_file(&path).unwrap();
        assert_eq!(config.grid_width, 30);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.max_speed, 10);
        assert_eq!(config.initial_speed, 7);
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(GameConfig::from_json_file(&temp_dir.path().join("nope.json")).is_err());
    }
}
