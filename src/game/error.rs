use thiserror::Error;

/// Errors produced by the game engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The pixel dimensions cannot be split into whole cells, or yield no cell on an axis
    #[error(
        "invalid dimensions {width}x{height} for cell size {cell_size}: \
         width and height must be positive multiples of the cell size"
    )]
    InvalidDimensions {
        width: u32,
        height: u32,
        cell_size: u32,
    },
}
