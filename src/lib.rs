//! Snake core - a deterministic snake simulation with a terminal front-end
//!
//! This library provides:
//! - Core game logic: grid, snake transitions, food placement, scoring and
//!   the tick clock (game module)
//! - A session controller tying the engine to its clock and score store
//!   (session module)
//! - High-score persistence (storage module)
//! - TUI input, rendering and the interactive mode (input, render, modes)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod session;
pub mod storage;
