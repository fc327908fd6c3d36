use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::config::GridSize;

/// A position on the game grid, in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Top-left pixel corner of this cell
    pub fn to_pixels(&self, cell_size: u32) -> (i64, i64) {
        let size = cell_size as i64;
        (self.x as i64 * size, self.y as i64 * size)
    }
}

/// The snake in the game
///
/// Segments are stored head first. The body is never empty: every mutation
/// that removes a segment is paired with one that added a segment earlier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    /// Create a one-segment snake
    pub fn new(head: Position) -> Self {
        Self {
            body: VecDeque::from([head]),
        }
    }

    /// Build a snake from explicit segments, head first.
    ///
    /// Returns `None` when `segments` is empty.
    #[cfg(test)]
    pub(crate) fn from_segments(segments: impl IntoIterator<Item = Position>) -> Option<Self> {
        let body: VecDeque<Position> = segments.into_iter().collect();
        if body.is_empty() {
            None
        } else {
            Some(Self { body })
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// All segments, head first
    pub fn segments(&self) -> impl ExactSizeIterator<Item = &Position> + '_ {
        self.body.iter()
    }

    /// Check if any segment sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// True if the head shares its cell with another segment
    pub fn head_overlaps_body(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|&segment| segment == head)
    }

    pub(crate) fn push_head(&mut self, head: Position) {
        self.body.push_front(head);
    }

    pub(crate) fn pop_head(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_front();
        }
    }

    pub(crate) fn pop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_back();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Coarse lifecycle of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    NotStarted,
    Running,
    GameOver,
}

/// Type of collision that ended a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Read-only copy of everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub grid: GridSize,
    /// Snake segments, head first
    pub snake: Vec<Position>,
    /// `None` only when the snake covers every cell
    pub food: Option<Position>,
    pub direction: Direction,
    pub score: u32,
    pub high_score: u32,
}

impl Snapshot {
    /// Head cell, `None` only for a hand-built empty snapshot
    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }
}
