//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The high score goes through the [`crate::storage::ScoreStore`] seam.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use config::GameConfig;
pub use engine::{GameEngine, TickResult};
pub use state::{CollisionType, GameState, Phase, Position, Snake};
