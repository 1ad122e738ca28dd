use std::time::Duration;

use thiserror::Error;

use crate::tetris::shapes::Shape;

/// Direct cell access outside the grid extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
pub struct BoundsError {
    pub x: i32,
    pub y: i32,
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board must be at least {min} cells wide, got {width}")]
    TooNarrow { width: usize, min: usize },
    #[error("board height {height} leaves no visible rows below {danger_rows} danger rows")]
    NoVisibleRows { height: usize, danger_rows: usize },
    #[error("gravity interval must be non-zero, got {0:?}")]
    ZeroGravity(Duration),
    #[error("spawn offset ({x}, {y}) puts a {shape:?} piece outside the board")]
    SpawnOutOfBounds { x: i32, y: i32, shape: Shape },
}
