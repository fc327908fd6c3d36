//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Any frontend (terminal, canvas, test harness) drives it through ticks and
//! commands and reads back a [`Snapshot`].

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod shared;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use config::{GameConfig, GridSize};
pub use engine::{GameEngine, TickOutcome};
pub use error::GameError;
pub use shared::SharedEngine;
pub use state::{CollisionType, Phase, Position, Snake, Snapshot};
