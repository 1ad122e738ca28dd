use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::tetris::grid::{Grid, Material};

// Channel levels the piece colors are mixed from.
const LOW: f32 = 0.1;
const MID: f32 = 0.3;
const HIGH: f32 = 0.5;

/// The 7 tetrominoes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

struct ShapeDef {
    size: usize,
    // Local (x, y) of each block, y up.
    blocks: [(i32, i32); 4],
    material: Material,
}

static SHAPE_DEFS: [ShapeDef; 7] = [
    // I
    ShapeDef {
        size: 4,
        blocks: [(0, 2), (1, 2), (2, 2), (3, 2)],
        material: Material::rgb(LOW, HIGH, HIGH),
    },
    // J
    ShapeDef {
        size: 3,
        blocks: [(0, 2), (0, 1), (1, 1), (2, 1)],
        material: Material::rgb(LOW, LOW, HIGH),
    },
    // L
    ShapeDef {
        size: 3,
        blocks: [(0, 1), (1, 1), (2, 1), (2, 2)],
        material: Material::rgb(HIGH, MID, LOW),
    },
    // O
    ShapeDef {
        size: 2,
        blocks: [(0, 0), (0, 1), (1, 0), (1, 1)],
        material: Material::rgb(HIGH, HIGH, LOW),
    },
    // S
    ShapeDef {
        size: 3,
        blocks: [(0, 1), (1, 1), (1, 2), (2, 2)],
        material: Material::rgb(LOW, HIGH, LOW),
    },
    // T
    ShapeDef {
        size: 3,
        blocks: [(0, 1), (1, 1), (2, 1), (1, 2)],
        material: Material::rgb(HIGH, LOW, HIGH),
    },
    // Z
    ShapeDef {
        size: 3,
        blocks: [(0, 2), (1, 2), (1, 1), (2, 1)],
        material: Material::rgb(HIGH, LOW, LOW),
    },
];

impl Shape {
    pub const ALL: [Shape; 7] = [
        Shape::I,
        Shape::J,
        Shape::L,
        Shape::O,
        Shape::S,
        Shape::T,
        Shape::Z,
    ];

    fn def(self) -> &'static ShapeDef {
        &SHAPE_DEFS[self as usize]
    }

    /// Side length of the square local grid the shape spawns in.
    pub fn size(self) -> usize {
        self.def().size
    }

    pub fn blocks(self) -> &'static [(i32, i32)] {
        &self.def().blocks
    }

    pub fn material(self) -> Material {
        self.def().material
    }

    /// Fresh local grid for a newly spawned piece of this shape.
    pub fn grid(self) -> Grid {
        let size = self.size();
        let blocks = self.blocks();
        let material = self.material();
        Grid::from_fn(size, size, |x, y| blocks.contains(&(x, y)).then_some(material))
    }
}

/// Supplies the shape of each newly spawned piece.
pub trait ShapeSource: Send + Sync {
    fn next_shape(&mut self) -> Shape;
}

/// Uniform random shapes from a seeded generator; the same seed always
/// yields the same spawn sequence.
pub struct RandomShapes {
    rng: StdRng,
}

impl RandomShapes {
    pub fn seeded(seed: u64) -> Self {
        RandomShapes {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ShapeSource for RandomShapes {
    fn next_shape(&mut self) -> Shape {
        Shape::ALL[self.rng.gen_range(0..Shape::ALL.len())]
    }
}

/// Cycles through a fixed list of shapes.
#[cfg(test)]
pub struct ShapeSequence {
    shapes: Vec<Shape>,
    next: usize,
}

#[cfg(test)]
impl ShapeSequence {
    pub fn new(shapes: &[Shape]) -> Self {
        assert!(!shapes.is_empty(), "shape sequence needs at least one shape");
        ShapeSequence {
            shapes: shapes.to_vec(),
            next: 0,
        }
    }
}

#[cfg(test)]
impl ShapeSource for ShapeSequence {
    fn next_shape(&mut self) -> Shape {
        let shape = self.shapes[self.next];
        self.next = (self.next + 1) % self.shapes.len();
        shape
    }
}
