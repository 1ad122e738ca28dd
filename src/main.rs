// src/main.rs
use std::time::Duration;

use bevy::prelude::*;
use bevy_blockfall::tetris::{ConfigError, Game, GameConfig, Intent, Material, TickOutcome};
use rand::Rng;

const CELL_SIZE: f32 = 28.0;
const CELL_GAP: f32 = 2.0;
const SEED_VAR: &str = "BLOCKFALL_SEED";

const KEY_BINDINGS: [(KeyCode, Intent); 9] = [
    (KeyCode::KeyA, Intent::MoveLeft),
    (KeyCode::ArrowLeft, Intent::MoveLeft),
    (KeyCode::KeyD, Intent::MoveRight),
    (KeyCode::ArrowRight, Intent::MoveRight),
    (KeyCode::KeyQ, Intent::RotateLeft),
    (KeyCode::KeyE, Intent::RotateRight),
    (KeyCode::ArrowUp, Intent::RotateRight),
    (KeyCode::KeyS, Intent::HardDrop),
    (KeyCode::ArrowDown, Intent::HardDrop),
];

#[derive(Resource)]
struct GameSeed(u64);

// Frame clock driving gravity.
#[derive(Resource)]
struct GravityTimer {
    fall_timer: Timer,
}

impl GravityTimer {
    fn new(interval: Duration) -> Self {
        GravityTimer {
            fall_timer: Timer::new(interval, TimerMode::Repeating),
        }
    }
}

/// One sprite per visible board cell.
#[derive(Component)]
struct CellSprite {
    x: i32,
    y: i32,
}

// Seed from the environment when given, so a run can be replayed.
fn game_seed() -> u64 {
    std::env::var(SEED_VAR)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or_else(|| rand::thread_rng().gen())
}

fn material_color(material: Material) -> Color {
    let [r, g, b] = material.0;
    Color::srgb(r, g, b)
}

fn setup_board(mut commands: Commands, game: Res<Game>, seed: Res<GameSeed>) {
    commands.spawn(Camera2d);

    let width = game.board().width();
    let visible = game.board().visible_height();
    let origin = Vec2::new(
        -(width as f32 - 1.0) * CELL_SIZE / 2.0,
        -(visible as f32 - 1.0) * CELL_SIZE / 2.0,
    );

    commands.spawn((
        Sprite::from_color(
            Color::srgb(0.15, 0.15, 0.15),
            Vec2::new(width as f32 * CELL_SIZE, visible as f32 * CELL_SIZE),
        ),
        Transform::from_xyz(0.0, 0.0, -1.0),
    ));

    for y in 0..visible as i32 {
        for x in 0..width as i32 {
            commands.spawn((
                Sprite::from_color(Color::WHITE, Vec2::splat(CELL_SIZE - CELL_GAP)),
                Transform::from_xyz(
                    origin.x + x as f32 * CELL_SIZE,
                    origin.y + y as f32 * CELL_SIZE,
                    0.0,
                ),
                Visibility::Hidden,
                CellSprite { x, y },
            ));
        }
    }
    info!(seed = seed.0, width, visible, "game ready");
}

fn player_input_system(keyboard_input: Res<ButtonInput<KeyCode>>, mut game: ResMut<Game>) {
    for (key, intent) in KEY_BINDINGS {
        if keyboard_input.just_pressed(key) {
            game.handle_intent(intent);
        }
    }
}

fn gravity_system(time: Res<Time>, mut gravity: ResMut<GravityTimer>, mut game: ResMut<Game>) {
    gravity.fall_timer.tick(time.delta());
    if !gravity.fall_timer.just_finished() {
        return;
    }

    match game.tick() {
        Ok(TickOutcome::Fell) => {}
        Ok(TickOutcome::Locked {
            rows_cleared,
            board_reset,
        }) => {
            debug!(rows_cleared, board_reset, "piece settled");
        }
        Err(err) => error!("gravity tick failed: {err}"),
    }
}

fn render_system(
    game: Res<Game>,
    mut cells: Query<(&CellSprite, &mut Sprite, &mut Visibility)>,
) {
    let piece: Vec<(i32, i32, Material)> = game.piece().cells().collect();

    for (cell, mut sprite, mut visibility) in &mut cells {
        let settled = game.board().get(cell.x, cell.y).ok().flatten();
        let material = settled.or_else(|| {
            piece
                .iter()
                .find(|&&(x, y, _)| x == cell.x && y == cell.y)
                .map(|&(_, _, material)| material)
        });

        match material {
            Some(material) => {
                sprite.color = material_color(material);
                *visibility = Visibility::Visible;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

fn main() -> Result<(), ConfigError> {
    let config = GameConfig::default();
    let seed = game_seed();
    let gravity = GravityTimer::new(config.gravity_interval);
    let game = Game::seeded(config, seed)?;

    App::new()
        .add_plugins(DefaultPlugins)
        .insert_resource(ClearColor(Color::srgb(0.1, 0.1, 0.1)))
        .insert_resource(game)
        .insert_resource(gravity)
        .insert_resource(GameSeed(seed))
        .add_systems(Startup, setup_board)
        .add_systems(
            Update,
            (
                player_input_system,
                gravity_system,
                render_system.run_if(resource_changed::<Game>),
            )
                .chain(),
        )
        .run();
    Ok(())
}
