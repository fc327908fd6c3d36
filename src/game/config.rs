use serde::{Deserialize, Serialize};

use super::error::GameError;
use super::state::Position;

/// Configuration for the game, in pixels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the playing field in pixels
    pub width: u32,
    /// Height of the playing field in pixels
    pub height: u32,
    /// Edge length of one square cell in pixels
    pub cell_size: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            cell_size: 20,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom dimensions
    pub fn new(width: u32, height: u32, cell_size: u32) -> Self {
        Self {
            width,
            height,
            cell_size,
        }
    }

    /// A 10x10 cell grid for testing
    pub fn small() -> Self {
        Self::new(100, 100, 10)
    }

    /// Check the dimensions and derive the cell grid from them
    pub fn validate(&self) -> Result<GridSize, GameError> {
        let invalid = GameError::InvalidDimensions {
            width: self.width,
            height: self.height,
            cell_size: self.cell_size,
        };

        if self.cell_size == 0 || self.width == 0 || self.height == 0 {
            return Err(invalid);
        }
        if self.width % self.cell_size != 0 || self.height % self.cell_size != 0 {
            return Err(invalid);
        }

        let cols = self.width / self.cell_size;
        let rows = self.height / self.cell_size;
        if cols > i32::MAX as u32 || rows > i32::MAX as u32 {
            return Err(invalid);
        }

        Ok(GridSize {
            cols: cols as i32,
            rows: rows as i32,
            cell_size: self.cell_size,
        })
    }
}

/// Validated grid geometry, in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub cols: i32,
    pub rows: i32,
    pub cell_size: u32,
}

impl GridSize {
    /// Check if a position is within the grid bounds
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.cols && pos.y >= 0 && pos.y < self.rows
    }

    /// The cell a fresh snake starts on
    pub fn center(&self) -> Position {
        Position::new(self.cols / 2, self.rows / 2)
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// Pixel bounds (width, height)
    pub fn pixel_bounds(&self) -> (i64, i64) {
        (
            self.cols as i64 * self.cell_size as i64,
            self.rows as i64 * self.cell_size as i64,
        )
    }

    /// Iterate every cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |y| (0..self.cols).map(move |x| Position::new(x, y)))
    }
}
