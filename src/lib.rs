//! Grid Snake - a tick-based Snake game
//!
//! This library provides:
//! - Core game engine, free of I/O (game module)
//! - Keyboard mapping for terminal input (input module)
//! - TUI rendering from engine snapshots (render module)
//! - The interactive terminal driver (modes module)

pub mod game;
pub mod input;
pub mod modes;
pub mod render;
