//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering
//! dependencies. The clock is the only piece that touches a runtime, and it
//! only hands out ticks.

pub mod action;
pub mod clock;
pub mod config;
pub mod engine;
pub mod food;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use clock::SimulationClock;
pub use config::{ConfigError, Difficulty, GameConfig, GridPreset};
pub use engine::{GameEngine, StepInfo, StepResult};
pub use food::FoodSpawner;
pub use state::{CollisionType, GameOverReason, GameState, Phase, Position, Snake};
