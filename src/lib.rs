//! Grid Snake - the classic snake game for the terminal
//!
//! This library provides:
//! - Core game logic (game module): tick, steering, food, speed milestones
//! - High score persistence behind a small key-value trait (storage module)
//! - Keyboard and mouse-swipe input (input module)
//! - TUI rendering with ratatui (render module)
//! - The interactive host loop (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod storage;
