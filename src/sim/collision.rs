//! Collision detection and response for the breakout ball
//!
//! At most one collision is resolved per tick. Candidates are tested in a
//! fixed priority order and the first hit short-circuits the rest:
//! platform, right wall, left wall, top wall, then bricks from the most
//! recently inserted to the first.

use glam::Vec3;

use super::aabb::Aabb;
use super::state::{BrickKind, GameEvent, GameState, SpecialObject, WallSide};
use crate::consts::PLATFORM_NORMAL_ANGLE;
use crate::normalize_degrees;

/// The single collision selected for this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Platform,
    Wall(WallSide),
    /// Index into `GameState::bricks`
    Brick(usize),
}

/// Which faces of a brick the ball struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrickHit {
    /// Left or right face: horizontal mirror
    Side,
    /// Near or far face: vertical mirror
    Vertical,
}

/// Map the ball's offset from the platform centre to a new heading.
///
/// The offset is clamped to the platform half-width, so the heading stays
/// within `270° ± max_deflection`.
pub fn platform_deflection(ball_x: f32, platform_x: f32, half_width: f32, max_deflection: f32) -> f32 {
    if half_width <= 0.0 {
        return PLATFORM_NORMAL_ANGLE;
    }
    let offset = (ball_x - platform_x).clamp(-half_width, half_width);
    normalize_degrees(PLATFORM_NORMAL_ANGLE + offset / half_width * max_deflection)
}

/// Mirror a heading: `360 - θ` for the top wall, plus 180 for side walls
#[inline]
pub fn reflect_direction(direction: f32, side_wall: bool) -> f32 {
    let mut reflected = 360.0 - direction;
    if side_wall {
        reflected += 180.0;
    }
    normalize_degrees(reflected)
}

/// Decide which faces of a brick the ball struck.
///
/// The ball's box one step back along `velocity` tells which axis it was
/// still clear on. Clear on x only: side hit. Clear on both (a corner):
/// the axis it crossed last wins, ties go vertical.
pub fn classify_brick_hit(ball: &Aabb, velocity: Vec3, brick: &Aabb) -> BrickHit {
    let prev = Aabb::new(ball.min - velocity, ball.max - velocity);
    let gap_x = (brick.min.x - prev.max.x).max(prev.min.x - brick.max.x);
    let gap_z = (brick.min.z - prev.max.z).max(prev.min.z - brick.max.z);

    match (gap_x > 0.0, gap_z > 0.0) {
        (true, false) => BrickHit::Side,
        (true, true) => {
            let entry_x = gap_x / velocity.x.abs();
            let entry_z = gap_z / velocity.z.abs();
            if entry_x > entry_z {
                BrickHit::Side
            } else {
                BrickHit::Vertical
            }
        }
        (false, _) => BrickHit::Vertical,
    }
}

/// Find the highest-priority collision for the ball's current position
pub fn detect_collision(state: &GameState) -> Option<Collision> {
    let ball = state.ball.collider();

    if ball.intersects(&state.platform.collider()) {
        return Some(Collision::Platform);
    }

    if let Some(wall) = state.field.walls.iter().find(|w| ball.intersects(&w.collider)) {
        return Some(Collision::Wall(wall.side));
    }

    state
        .bricks
        .iter()
        .enumerate()
        .rev()
        .find(|(_, brick)| brick.alive && ball.intersects(brick.collider()))
        .map(|(index, _)| Collision::Brick(index))
}

/// Apply the response for a detected collision
pub fn resolve_collision(state: &mut GameState, collision: Collision) {
    match collision {
        Collision::Platform => {
            reset_wall_contacts(state);
            resolve_platform(state);
        }
        Collision::Wall(side) => resolve_wall(state, side),
        Collision::Brick(index) => {
            reset_wall_contacts(state);
            resolve_brick(state, index);
        }
    }
}

/// Forget consecutive wall contacts (any other outcome breaks the streak)
pub fn reset_wall_contacts(state: &mut GameState) {
    state.wall_hits = [0; 3];
}

fn resolve_platform(state: &mut GameState) {
    let direction = platform_deflection(
        state.ball.position.x,
        state.platform.x,
        state.platform.width / 2.0,
        state.config.max_deflection,
    );
    state.ball.set_direction(direction);
    state.events.push(GameEvent::PlatformHit { direction });

    if state.charges > 0 {
        state.charges -= 1;
        state.attach_ball();
        log::debug!("Ball caught by platform, {} charges left", state.charges);
    }
}

fn resolve_wall(state: &mut GameState, side: WallSide) {
    let streak = state.wall_hits[side.index()];
    let reflected = streak == 0;

    if reflected {
        state.ball.reflect(side.is_side());
    } else {
        // Still overlapping since the last reflection: push back inside
        let radius = state.ball.radius;
        match side {
            WallSide::Right => state.ball.position.x = state.config.field_half_width() - radius,
            WallSide::Left => state.ball.position.x = -state.config.field_half_width() + radius,
            WallSide::Top => state.ball.position.z = -state.config.field_half_depth() + radius,
        }
    }

    state.wall_hits = [0; 3];
    state.wall_hits[side.index()] = streak + 1;
    state.events.push(GameEvent::WallHit { side, reflected });
}

fn resolve_brick(state: &mut GameState, index: usize) {
    let ball_collider = state.ball.collider();
    let (id, kind, points, position, hit) = {
        let brick = &state.bricks[index];
        let hit = classify_brick_hit(&ball_collider, state.ball.velocity(), brick.collider());
        (brick.id, brick.kind, brick.points, brick.position, hit)
    };

    state.ball.reflect(hit == BrickHit::Side);
    state.bricks[index].alive = false;
    state.points += points;
    state.events.push(GameEvent::BrickDestroyed { id, kind, points });
    log::debug!("Brick {} destroyed ({:?} hit), {} points", id, hit, state.points);

    if kind == BrickKind::Special {
        let special_id = state.next_entity_id();
        let spawn = Vec3::new(position.x, state.config.platform_y(), position.z);
        state
            .specials
            .push(SpecialObject::new(special_id, id, spawn, state.config.special_speed));
        state.events.push(GameEvent::SpecialSpawned {
            id: special_id,
            source_brick: id,
        });
    }

    if state.remaining_bricks() == 0 {
        state.victory = true;
        state.events.push(GameEvent::Victory);
        log::info!("Victory with {} points", state.points);
    }
}
