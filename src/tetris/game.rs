use bevy::log::{debug, info, warn};
use bevy::prelude::Resource;

use crate::tetris::board::Board;
use crate::tetris::config::GameConfig;
use crate::tetris::error::{BoundsError, ConfigError};
use crate::tetris::piece::ActivePiece;
use crate::tetris::shapes::{RandomShapes, ShapeSource};

/// A discrete player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    RotateLeft,
    RotateRight,
    HardDrop,
}

/// What a gravity tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The piece moved down one row.
    Fell,
    /// The piece settled into the board and a new one spawned.
    Locked { rows_cleared: u32, board_reset: bool },
}

/// One running game: the board, the falling piece and the stream of shapes
/// that replaces it. Never ends; a full well resets the board instead.
#[derive(Resource)]
pub struct Game {
    config: GameConfig,
    board: Board,
    piece: ActivePiece,
    shapes: Box<dyn ShapeSource>,
}

impl Game {
    pub fn new(config: GameConfig, shapes: impl ShapeSource + 'static) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::new(config.width, config.height, config.danger_rows);
        let mut shapes: Box<dyn ShapeSource> = Box::new(shapes);
        let shape = shapes.next_shape();
        let piece = ActivePiece::spawn(shape, config.spawn);
        debug!(?shape, "spawned first piece");
        Ok(Game {
            config,
            board,
            piece,
            shapes,
        })
    }

    /// Game with a uniformly random piece stream derived from `seed`.
    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Game::new(config, RandomShapes::seeded(seed))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece(&self) -> &ActivePiece {
        &self.piece
    }

    /// Applies a player command to the falling piece. Returns whether it
    /// took effect; a blocked command leaves everything as it was.
    pub fn handle_intent(&mut self, intent: Intent) -> bool {
        let board = &self.board;
        match intent {
            Intent::MoveLeft => self.piece.move_left(board),
            Intent::MoveRight => self.piece.move_right(board),
            Intent::RotateLeft => self.piece.rotate_left(board),
            Intent::RotateRight => self.piece.rotate_right(board),
            Intent::HardDrop => self.piece.drop(board),
        }
    }

    /// One gravity step. Lowers the piece if it can fall; otherwise merges
    /// it, clears full rows, resets the board when the danger zone is
    /// occupied and spawns the next piece.
    pub fn tick(&mut self) -> Result<TickOutcome, BoundsError> {
        if self.piece.fall(&self.board) {
            return Ok(TickOutcome::Fell);
        }

        self.board.merge_active_piece(&self.piece)?;
        debug!(x = self.piece.x(), y = self.piece.y(), "piece locked");

        let rows_cleared = self.board.clear_full_rows();
        if rows_cleared > 0 {
            info!(rows_cleared, "cleared rows");
        }

        let mut board_reset = false;
        if self.board.has_blocks_in_danger_zone() {
            info!("blocks reached the danger zone, resetting board");
            self.board.reset();
            board_reset = true;
        }

        if !self.spawn_next() {
            board_reset = true;
        }

        Ok(TickOutcome::Locked {
            rows_cleared,
            board_reset,
        })
    }

    // Returns false if the new piece overlapped the board and the board had
    // to be cleared to make room for it.
    fn spawn_next(&mut self) -> bool {
        let shape = self.shapes.next_shape();
        self.piece = ActivePiece::spawn(shape, self.config.spawn);
        debug!(?shape, "spawned piece");

        if self.piece.fits(&self.board) {
            return true;
        }
        warn!(?shape, "spawn position blocked, resetting board");
        self.board.reset();
        false
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::tetris::grid::Material;
    use crate::tetris::shapes::{Shape, ShapeSequence};

    const GREY: Material = Material::rgb(0.3, 0.3, 0.3);

    fn game_with(shapes: &[Shape]) -> Game {
        Game::new(GameConfig::default(), ShapeSequence::new(shapes)).unwrap()
    }

    fn fill_row_except(game: &mut Game, y: i32, gaps: &[i32]) {
        for x in 0..game.board.width() as i32 {
            if !gaps.contains(&x) {
                game.board.set(x, y, Some(GREY)).unwrap();
            }
        }
    }

    fn assert_no_overlap(game: &Game) {
        for (x, y, _) in game.piece().cells() {
            assert!(
                game.board().is_empty(x, y),
                "piece block at ({}, {}) overlaps the board",
                x,
                y
            );
        }
    }

    #[test]
    fn test_new_game_spawns_at_top_center() {
        let game = game_with(&[Shape::T]);
        assert_eq!((game.piece().x(), game.piece().y()), (3, 19));
        assert_eq!(game.board().blocks().count(), 0);
        assert_eq!(game.piece(), &ActivePiece::spawn(Shape::T, (3, 19)));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GameConfig::with_size(2, 22);
        assert!(matches!(
            Game::new(config, ShapeSequence::new(&[Shape::O])),
            Err(ConfigError::TooNarrow { .. })
        ));
    }

    #[test]
    fn test_intents_dispatch_to_piece() {
        let mut game = game_with(&[Shape::T]);
        assert!(game.handle_intent(Intent::MoveLeft));
        assert_eq!(game.piece().x(), 2);
        assert!(game.handle_intent(Intent::MoveRight));
        assert_eq!(game.piece().x(), 3);
        assert!(game.handle_intent(Intent::HardDrop));
        assert_eq!(game.piece().y(), -1, "T's lowest row is local row 1");
        assert!(!game.handle_intent(Intent::HardDrop));
    }

    #[test]
    fn test_rotation_intents() {
        let mut game = game_with(&[Shape::T]);
        let spawned = game.piece().clone();
        assert!(game.handle_intent(Intent::RotateRight));
        assert_ne!(game.piece(), &spawned);
        assert!(game.handle_intent(Intent::RotateLeft));
        assert_eq!(game.piece(), &spawned);

        // flat on the floor, turning would push the stem below row 0
        game.handle_intent(Intent::HardDrop);
        let grounded = game.piece().clone();
        assert!(!game.handle_intent(Intent::RotateRight));
        assert_eq!(game.piece(), &grounded);
    }

    #[test]
    fn test_tick_lowers_piece() {
        let mut game = game_with(&[Shape::O]);
        assert_eq!(game.tick(), Ok(TickOutcome::Fell));
        assert_eq!(game.piece().y(), 18);
    }

    #[test]
    fn test_tick_locks_grounded_piece_and_spawns_next() {
        let mut game = game_with(&[Shape::O, Shape::I]);
        game.handle_intent(Intent::HardDrop);
        assert_eq!(
            game.tick(),
            Ok(TickOutcome::Locked {
                rows_cleared: 0,
                board_reset: false
            })
        );
        for (x, y) in [(3, 0), (4, 0), (3, 1), (4, 1)] {
            assert_eq!(game.board().get(x, y), Ok(Some(Shape::O.material())));
        }
        assert_eq!(game.piece(), &ActivePiece::spawn(Shape::I, (3, 19)));
    }

    #[test]
    fn test_gravity_alone_brings_piece_down() {
        let mut game = game_with(&[Shape::O]);
        for _ in 0..19 {
            assert_eq!(game.tick(), Ok(TickOutcome::Fell));
        }
        assert!(matches!(game.tick(), Ok(TickOutcome::Locked { .. })));
        assert_eq!(game.board().blocks().count(), 4);
    }

    #[test]
    fn test_lock_clears_completed_row() {
        let mut game = game_with(&[Shape::O]);
        fill_row_except(&mut game, 0, &[3, 4]);
        game.handle_intent(Intent::HardDrop);

        assert_eq!(
            game.tick(),
            Ok(TickOutcome::Locked {
                rows_cleared: 1,
                board_reset: false
            })
        );
        // the O's top half drops into row 0
        let blocks: Vec<(i32, i32)> = game.board().blocks().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(blocks, vec![(3, 0), (4, 0)]);
    }

    #[test]
    fn test_lock_clears_stacked_rows() {
        let mut game = game_with(&[Shape::O]);
        fill_row_except(&mut game, 0, &[3, 4]);
        fill_row_except(&mut game, 1, &[3, 4]);
        game.handle_intent(Intent::HardDrop);

        assert_eq!(
            game.tick(),
            Ok(TickOutcome::Locked {
                rows_cleared: 2,
                board_reset: false
            })
        );
        assert_eq!(game.board().blocks().count(), 0);
    }

    #[test]
    fn test_danger_zone_resets_board() {
        let mut game = game_with(&[Shape::O]);
        game.board.set(0, 20, Some(GREY)).unwrap();
        game.board.set(9, 21, Some(GREY)).unwrap();
        game.board.set(0, 5, Some(GREY)).unwrap();
        game.handle_intent(Intent::HardDrop);

        assert_eq!(
            game.tick(),
            Ok(TickOutcome::Locked {
                rows_cleared: 0,
                board_reset: true
            })
        );
        for y in 0..22 {
            for x in 0..10 {
                assert_eq!(game.board().get(x, y), Ok(None), "({}, {}) should be empty", x, y);
            }
        }
    }

    #[test]
    fn test_blocked_spawn_resets_board() {
        let mut game = game_with(&[Shape::O]);
        for _ in 0..3 {
            assert!(game.handle_intent(Intent::MoveLeft));
        }
        // under the next spawn, clear of the piece now at x = 0
        game.board.set(3, 19, Some(GREY)).unwrap();
        game.handle_intent(Intent::HardDrop);

        assert_eq!(
            game.tick(),
            Ok(TickOutcome::Locked {
                rows_cleared: 0,
                board_reset: true
            })
        );
        assert_eq!(game.board().blocks().count(), 0);
        assert_no_overlap(&game);
    }

    #[test]
    fn test_seeded_games_replay_identically() {
        let mut a = Game::seeded(GameConfig::default(), 42).unwrap();
        let mut b = Game::seeded(GameConfig::default(), 42).unwrap();
        for _ in 0..200 {
            a.handle_intent(Intent::HardDrop);
            b.handle_intent(Intent::HardDrop);
            assert_eq!(a.tick(), b.tick());
            assert_eq!(a.piece(), b.piece());
            assert_eq!(a.board(), b.board());
        }
    }

    fn intent_strategy() -> impl Strategy<Value = Option<Intent>> {
        prop_oneof![
            Just(Some(Intent::MoveLeft)),
            Just(Some(Intent::MoveRight)),
            Just(Some(Intent::RotateLeft)),
            Just(Some(Intent::RotateRight)),
            Just(Some(Intent::HardDrop)),
            // gravity tick
            Just(None),
        ]
    }

    proptest! {
        #[test]
        fn prop_piece_never_overlaps_board(
            seed in any::<u64>(),
            steps in prop::collection::vec(intent_strategy(), 1..400),
        ) {
            let mut game = Game::seeded(GameConfig::default(), seed).unwrap();
            for step in steps {
                match step {
                    Some(intent) => {
                        game.handle_intent(intent);
                    }
                    None => {
                        prop_assert!(game.tick().is_ok());
                    }
                }
                for (x, y, _) in game.piece().cells() {
                    prop_assert!(game.board().is_empty(x, y), "overlap at ({}, {})", x, y);
                }
                prop_assert!(!game.board().has_blocks_in_danger_zone());
            }
        }

        #[test]
        fn prop_rejected_intents_change_nothing(
            seed in any::<u64>(),
            steps in prop::collection::vec(intent_strategy(), 1..200),
        ) {
            let mut game = Game::seeded(GameConfig::default(), seed).unwrap();
            for step in steps {
                let Some(intent) = step else {
                    prop_assert!(game.tick().is_ok());
                    continue;
                };
                let before = game.piece().clone();
                if !game.handle_intent(intent) {
                    prop_assert_eq!(game.piece(), &before);
                }
            }
        }
    }
}
