use crate::tetris::grid::{Grid, Material, Occupancy};
use crate::tetris::shapes::Shape;

/// The falling, player-controlled piece: a small local grid placed at
/// `(x, y)` in board coordinates.
///
/// Every mutator validates against the board first and either applies in
/// full or leaves the piece untouched. A rejected move is an ordinary
/// outcome and reported as `false`.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivePiece {
    grid: Grid,
    x: i32,
    y: i32,
}

impl ActivePiece {
    pub fn new(grid: Grid, x: i32, y: i32) -> Self {
        ActivePiece { grid, x, y }
    }

    pub fn spawn(shape: Shape, (x, y): (i32, i32)) -> Self {
        ActivePiece::new(shape.grid(), x, y)
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Board-space coordinates and material of every block.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, Material)> + '_ {
        self.grid
            .occupied()
            .map(move |(lx, ly, material)| (lx + self.x, ly + self.y, material))
    }

    /// True iff no block sits on an occupied or out-of-bounds cell.
    pub fn fits(&self, board: &impl Occupancy) -> bool {
        self.cells().all(|(x, y, _)| board.is_empty(x, y))
    }

    pub fn move_left(&mut self, board: &impl Occupancy) -> bool {
        self.shift(board, -1)
    }

    pub fn move_right(&mut self, board: &impl Occupancy) -> bool {
        self.shift(board, 1)
    }

    // Only the leading block of each row is probed. That is sufficient while
    // every row of the shape is one contiguous span, which holds for all
    // seven tetrominoes.
    fn shift(&mut self, board: &impl Occupancy, dx: i32) -> bool {
        for ly in 0..self.grid.height() as i32 {
            let mut row = (0..self.grid.width() as i32).filter(|&lx| !self.grid.is_empty(lx, ly));
            let leading = if dx < 0 { row.next() } else { row.last() };
            if let Some(lx) = leading {
                if !board.is_empty(lx + self.x + dx, ly + self.y) {
                    return false;
                }
            }
        }
        self.x += dx;
        true
    }

    /// Quarter turn counter-clockwise.
    pub fn rotate_left(&mut self, board: &impl Occupancy) -> bool {
        let old = &self.grid;
        let h = old.height() as i32;
        let rotated = Grid::from_fn(old.height(), old.width(), |x, y| {
            old.get(y, h - 1 - x).ok().flatten()
        });
        self.commit_rotation(board, rotated)
    }

    /// Quarter turn clockwise.
    pub fn rotate_right(&mut self, board: &impl Occupancy) -> bool {
        let old = &self.grid;
        let w = old.width() as i32;
        let rotated = Grid::from_fn(old.height(), old.width(), |x, y| {
            old.get(w - 1 - y, x).ok().flatten()
        });
        self.commit_rotation(board, rotated)
    }

    // No wall kicks: a colliding rotation is simply dropped.
    fn commit_rotation(&mut self, board: &impl Occupancy, rotated: Grid) -> bool {
        let collides = rotated
            .occupied()
            .any(|(lx, ly, _)| !board.is_empty(lx + self.x, ly + self.y));
        if collides {
            return false;
        }
        self.grid = rotated;
        true
    }

    /// Hard drop: lowers the piece in one step to the lowest position any
    /// of its columns allows. Returns false if it was already resting.
    pub fn drop(&mut self, board: &impl Occupancy) -> bool {
        let distance = (0..self.grid.width() as i32)
            .filter_map(|lx| {
                (0..self.grid.height() as i32)
                    .find(|&ly| !self.grid.is_empty(lx, ly))
                    .map(|ly| (lx + self.x, ly + self.y))
            })
            .map(|(x, y)| y - board.nearest_fall_point(x, y).1)
            .min();
        match distance {
            Some(distance) if distance > 0 => {
                self.y -= distance;
                true
            }
            _ => false,
        }
    }

    /// True iff the cell under every block is free.
    pub fn can_fall(&self, board: &impl Occupancy) -> bool {
        self.cells().all(|(x, y, _)| board.is_empty(x, y - 1))
    }

    /// One gravity step down, if there is room.
    pub fn fall(&mut self, board: &impl Occupancy) -> bool {
        if !self.can_fall(board) {
            return false;
        }
        self.y -= 1;
        true
    }
}
