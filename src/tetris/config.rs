use std::time::Duration;

use crate::tetris::error::ConfigError;
use crate::tetris::shapes::Shape;

pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 22;
// Rows above the visible playfield. Settling a block here resets the board.
pub const DANGER_ROWS: usize = 2;
pub const GRAVITY_INTERVAL: Duration = Duration::from_secs(1);

/// Widest local grid of any shape (the I piece).
const MAX_SHAPE_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub danger_rows: usize,
    /// Board position of a new piece's local origin.
    pub spawn: (i32, i32),
    pub gravity_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::with_size(BOARD_WIDTH, BOARD_HEIGHT)
    }
}

impl GameConfig {
    /// A `width x height` board with the standard danger zone, spawning
    /// pieces top-center with their lowest local row on the last visible row.
    /// 10x22 gives a spawn of (3, 19).
    pub fn with_size(width: usize, height: usize) -> Self {
        let spawn_x = (width as i32 - MAX_SHAPE_SIZE as i32) / 2;
        let spawn_y = height as i32 - DANGER_ROWS as i32 - 1;
        GameConfig {
            width,
            height,
            danger_rows: DANGER_ROWS,
            spawn: (spawn_x, spawn_y),
            gravity_interval: GRAVITY_INTERVAL,
        }
    }

    pub fn visible_height(&self) -> usize {
        self.height.saturating_sub(self.danger_rows)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MAX_SHAPE_SIZE {
            return Err(ConfigError::TooNarrow {
                width: self.width,
                min: MAX_SHAPE_SIZE,
            });
        }
        if self.visible_height() == 0 {
            return Err(ConfigError::NoVisibleRows {
                height: self.height,
                danger_rows: self.danger_rows,
            });
        }
        if self.gravity_interval.is_zero() {
            return Err(ConfigError::ZeroGravity(self.gravity_interval));
        }
        let (x, y) = self.spawn;
        for shape in Shape::ALL {
            let inside = shape.blocks().iter().all(|&(bx, by)| {
                let (bx, by) = (bx + x, by + y);
                bx >= 0 && by >= 0 && (bx as usize) < self.width && (by as usize) < self.height
            });
            if !inside {
                return Err(ConfigError::SpawnOutOfBounds { x, y, shape });
            }
        }
        Ok(())
    }
}
