//! Falling-block game rules: the board, the active piece and the gravity
//! loop that ties them together. No rendering, input or timing lives here;
//! a driver feeds in [`Intent`]s and gravity ticks and reads the state back.

mod board;
mod config;
mod error;
mod game;
mod grid;
mod piece;
mod shapes;

pub use board::Board;
pub use config::{GameConfig, BOARD_HEIGHT, BOARD_WIDTH, DANGER_ROWS, GRAVITY_INTERVAL};
pub use error::{BoundsError, ConfigError};
pub use game::{Game, Intent, TickOutcome};
pub use grid::{Cell, Grid, Material, Occupancy};
pub use piece::ActivePiece;
pub use shapes::{RandomShapes, Shape, ShapeSource};
