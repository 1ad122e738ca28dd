use crate::tetris::error::BoundsError;
use crate::tetris::grid::{Cell, Grid, Material, Occupancy};
use crate::tetris::piece::ActivePiece;

/// The well: settled blocks, row 0 at the bottom. The top `danger_rows`
/// rows sit above the visible playfield; anything settling there resets
/// the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    grid: Grid,
    danger_rows: usize,
}

impl Board {
    pub fn new(width: usize, height: usize, danger_rows: usize) -> Self {
        debug_assert!(danger_rows <= height);
        Board {
            grid: Grid::new(width, height),
            danger_rows,
        }
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn danger_rows(&self) -> usize {
        self.danger_rows
    }

    /// Number of rows below the danger zone.
    pub fn visible_height(&self) -> usize {
        self.grid.height() - self.danger_rows
    }

    pub fn is_empty(&self, x: i32, y: i32) -> bool {
        self.grid.is_empty(x, y)
    }

    pub fn get(&self, x: i32, y: i32) -> Result<Cell, BoundsError> {
        self.grid.get(x, y)
    }

    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> Result<(), BoundsError> {
        self.grid.set(x, y, cell)
    }

    /// Writes the piece's blocks into the board. Nothing is written unless
    /// every block is in bounds. Overlap is not checked.
    pub fn merge_active_piece(&mut self, piece: &ActivePiece) -> Result<(), BoundsError> {
        if let Some((x, y, _)) = piece.cells().find(|&(x, y, _)| !self.grid.is_in_bounds(x, y)) {
            return Err(self.grid.bounds_error(x, y));
        }
        for (x, y, material) in piece.cells() {
            self.grid.set(x, y, Some(material))?;
        }
        Ok(())
    }

    /// False for rows outside the board.
    pub fn is_row_full(&self, y: i32) -> bool {
        if y < 0 || y as usize >= self.height() {
            return false;
        }
        self.grid.row(y as usize).iter().all(Option::is_some)
    }

    /// Removes row `y`; rows above it move down by one and the top row
    /// comes back empty.
    pub fn delete_row(&mut self, y: i32) -> Result<(), BoundsError> {
        if y < 0 || y as usize >= self.height() {
            return Err(self.grid.bounds_error(0, y));
        }
        self.grid.remove_row(y as usize);
        Ok(())
    }

    /// Deletes every full visible row and returns how many went.
    pub fn clear_full_rows(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = 0;
        while y < self.visible_height() {
            if self.is_row_full(y as i32) {
                self.grid.remove_row(y);
                cleared += 1;
                // same index again: the row above just moved into it
                continue;
            }
            y += 1;
        }
        cleared
    }

    pub fn has_blocks_in_danger_zone(&self) -> bool {
        (self.visible_height()..self.height())
            .any(|y| self.grid.row(y).iter().any(Option::is_some))
    }

    pub fn reset(&mut self) {
        self.grid.clear();
    }

    /// Iterates every settled block as `(x, y, material)`.
    pub fn blocks(&self) -> impl Iterator<Item = (i32, i32, Material)> + '_ {
        self.grid.occupied()
    }
}

impl Occupancy for Board {
    fn is_empty(&self, x: i32, y: i32) -> bool {
        Board::is_empty(self, x, y)
    }
}
