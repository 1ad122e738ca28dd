use crate::tetris::error::BoundsError;

/// Occupant payload of a cell. Only equality matters to the game rules; the
/// renderer reads it as an RGB color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material(pub [f32; 3]);

impl Material {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Material([r, g, b])
    }
}

/// `None` is an empty cell.
pub type Cell = Option<Material>;

/// Fixed-size rectangular grid of cells.
/// Row-major storage, row 0 at the bottom, x growing to the right.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Grid {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Builds a grid by asking `f` for the contents of every `(x, y)`.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(i32, i32) -> Cell) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                cells.push(f(x, y));
            }
        }
        Grid {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.is_in_bounds(x, y) {
            return None;
        }
        Some(x as usize + y as usize * self.width)
    }

    pub(crate) fn bounds_error(&self, x: i32, y: i32) -> BoundsError {
        BoundsError {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    /// True iff `(x, y)` is inside the grid and unoccupied.
    pub fn is_empty(&self, x: i32, y: i32) -> bool {
        matches!(self.index(x, y).map(|i| self.cells[i]), Some(None))
    }

    pub fn get(&self, x: i32, y: i32) -> Result<Cell, BoundsError> {
        match self.index(x, y) {
            Some(i) => Ok(self.cells[i]),
            None => Err(self.bounds_error(x, y)),
        }
    }

    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> Result<(), BoundsError> {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                Ok(())
            }
            None => Err(self.bounds_error(x, y)),
        }
    }

    /// Local coordinates and material of every occupied cell, bottom row first.
    pub fn occupied(&self) -> impl Iterator<Item = (i32, i32, Material)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.map(|material| ((i % self.width) as i32, (i / self.width) as i32, material))
        })
    }

    pub fn row(&self, y: usize) -> &[Cell] {
        let start = y * self.width;
        &self.cells[start..start + self.width]
    }

    /// Removes row `y` and appends an empty row at the top, so every row
    /// above `y` moves down by one. `y` must be in bounds.
    pub(crate) fn remove_row(&mut self, y: usize) {
        debug_assert!(y < self.height, "row {} out of range (height {})", y, self.height);
        let start = y * self.width;
        self.cells.drain(start..start + self.width);
        self.cells.extend(std::iter::repeat(None).take(self.width));
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }
}

/// Read-only collision query handed to the active piece.
pub trait Occupancy {
    fn is_empty(&self, x: i32, y: i32) -> bool;

    /// The cell directly above the first occupied cell strictly below
    /// `(x, y)`, or `(x, 0)` when the column is clear down to the floor.
    fn nearest_fall_point(&self, x: i32, y: i32) -> (i32, i32) {
        for yy in (0..y).rev() {
            if !self.is_empty(x, yy) {
                return (x, yy + 1);
            }
        }
        (x, 0)
    }
}

impl<F> Occupancy for F
where
    F: Fn(i32, i32) -> bool,
{
    fn is_empty(&self, x: i32, y: i32) -> bool {
        self(x, y)
    }
}
