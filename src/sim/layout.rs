//! Brick grid generation

use glam::Vec3;
use rand::Rng;

use super::state::{Brick, BrickKind, GameState};

/// Lay out the brick grid for the configured difficulty.
///
/// Rows start against the top wall and grow toward the player; columns span
/// the full field width. Each brick rolls 0..=100 once: below the tier's
/// threshold it is normal, otherwise special.
pub fn generate_bricks(state: &mut GameState) {
    let config = state.config.clone();
    let rows = config.difficulty.brick_rows();
    let columns = config.brick_columns;
    let width = config.brick_width();
    let depth = config.brick_depth;
    let height = config.brick_height;
    let threshold = config.difficulty.normal_brick_threshold();

    state.bricks.clear();
    state.bricks.reserve((rows * columns) as usize);

    for row in 0..rows {
        for col in 0..columns {
            let x = -config.field_half_width() + width / 2.0 + width * col as f32;
            let z = -config.field_half_depth() + depth / 2.0 + depth * row as f32;
            let position = Vec3::new(x, height / 2.0 + 1.0, z);

            let roll: u32 = state.rng.random_range(0..=100);
            let kind = if roll < threshold {
                BrickKind::Normal
            } else {
                BrickKind::Special
            };

            let id = state.next_entity_id();
            state.bricks.push(Brick::new(
                id,
                kind,
                kind.points(&config),
                position,
                Vec3::new(width, height, depth),
                config.brick_collider_margin,
            ));
        }
    }

    let specials = state
        .bricks
        .iter()
        .filter(|b| b.kind == BrickKind::Special)
        .count();
    log::debug!("Generated {} rows x {} columns ({} special)", rows, columns, specials);
}
