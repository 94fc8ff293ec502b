//! Per-frame simulation tick
//!
//! One call per rendered frame. Order: pause handling, platform movement,
//! ball movement, defeat check, falling power-ups, then the collision
//! cascade (at most one response).

use serde::{Deserialize, Serialize};

use super::collision::{Collision, detect_collision, reset_wall_contacts, resolve_collision};
use super::state::{GameEvent, GameState};

/// Input intents for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Release an attached ball
    pub launch: bool,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - the platform plays by itself
    pub autopilot: bool,
}

/// Advance the game by one frame. No-op once the game is won or lost.
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    if state.is_terminal() {
        return;
    }

    if input.pause {
        state.paused = !state.paused;
        state.events.push(GameEvent::PauseToggled {
            paused: state.paused,
        });
    }
    if state.paused {
        return;
    }

    let input = if input.autopilot {
        autopilot_input(state)
    } else {
        input.clone()
    };

    state.time_ticks += 1;

    move_platform(state, &input);

    if state.ball_paused {
        state.ball.follow_platform(state.platform.x);
        if input.launch {
            state.launch_ball();
        }
    }

    if !state.ball_paused {
        state.ball.advance();

        if state.ball.position.z > state.platform.far_edge_z() {
            state.alive = false;
            state.events.push(GameEvent::Defeat);
            log::info!("Ball lost, final score {}", state.points);
            return;
        }
    }

    update_specials(state);

    if state.ball_paused {
        return;
    }

    match detect_collision(state) {
        Some(collision) => resolve_collision(state, collision),
        None => reset_wall_contacts(state),
    }
}

/// Move the platform when exactly one direction is held
pub fn move_platform(state: &mut GameState, input: &TickInput) {
    let field_width = state.config.field_width;
    let speed = state.config.platform_speed;
    if input.move_right && !input.move_left {
        state.platform.move_right(field_width, speed);
    } else if input.move_left && !input.move_right {
        state.platform.move_left(field_width, speed);
    }
}

/// Drop falling power-ups; catch grants charges, passing the platform removes them
pub fn update_specials(state: &mut GameState) {
    let platform = state.platform.collider();
    let far_edge = state.platform.far_edge_z();
    let per_catch = state.config.charges_per_catch;
    let max_charges = state.config.max_charges;

    let mut charges = state.charges;
    let mut events = Vec::new();

    state.specials.retain_mut(|special| {
        special.fall();
        if special.collider().intersects(&platform) {
            charges = (charges + per_catch).min(max_charges);
            events.push(GameEvent::SpecialCaught {
                id: special.id,
                charges,
            });
            false
        } else if special.position.z > far_edge {
            events.push(GameEvent::SpecialMissed { id: special.id });
            false
        } else {
            true
        }
    });

    if charges != state.charges {
        log::debug!("Power-up caught, charges {} -> {}", state.charges, charges);
    }
    state.charges = charges;
    state.events.extend(events);
}

/// Steer the platform toward the ball, or toward a power-up while the ball
/// is heading away
fn autopilot_input(state: &GameState) -> TickInput {
    let ball = &state.ball;
    let heading_away = ball.velocity().z < 0.0;

    let nearest_special = state
        .specials
        .iter()
        .max_by(|a, b| {
            a.position
                .z
                .partial_cmp(&b.position.z)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|s| s.position.x);

    // Slow sweep across the platform face
    let wobble = (state.time_ticks as f32 * 0.05).sin() * state.platform.width * 0.3;
    let target = match nearest_special {
        Some(x) if heading_away && !state.ball_paused => x,
        _ => ball.position.x + wobble,
    };

    let dead_zone = state.config.platform_speed / 2.0;
    TickInput {
        move_left: target < state.platform.x - dead_zone,
        move_right: target > state.platform.x + dead_zone,
        launch: state.ball_paused,
        pause: false,
        autopilot: true,
    }
}

/// Collision that would be resolved on the next tick, for debugging overlays
pub fn peek_collision(state: &GameState) -> Option<Collision> {
    if state.ball_paused || state.is_terminal() {
        None
    } else {
        detect_collision(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Difficulty, GameConfig};
    use crate::sim::state::{Brick, BrickKind, GamePhase, SpecialObject, WallSide};
    use glam::Vec3;

    fn empty_state() -> GameState {
        let mut state = GameState::new(GameConfig::default(), 12345);
        state.bricks.clear();
        state
    }

    fn free_ball(state: &mut GameState, position: Vec3, direction: f32) {
        state.ball_paused = false;
        state.ball.position = position;
        state.ball.set_direction(direction);
        state.ball.speed = 4.0;
    }

    fn brick_at(id: u32, x: f32, z: f32) -> Brick {
        Brick::new(id, BrickKind::Normal, 10, Vec3::new(x, 18.5, z), Vec3::new(40.0, 35.0, 20.0), 2.0)
    }

    #[test]
    fn test_tick_serve_to_playing() {
        let mut state = GameState::new(GameConfig::default(), 12345);
        assert_eq!(state.phase(), GamePhase::Serve);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase(), GamePhase::Serve);
        assert_eq!(state.ball.position.z, state.config.ball_attach_z());

        let input = TickInput {
            launch: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.phase(), GamePhase::Playing);
        assert!(state.ball.position.z < state.config.ball_attach_z());
        assert!(matches!(state.events[0], GameEvent::BallLaunched { .. }));
    }

    #[test]
    fn test_attached_ball_follows_platform() {
        let mut state = GameState::new(GameConfig::default(), 12345);
        let input = TickInput {
            move_right: true,
            ..Default::default()
        };
        for _ in 0..5 {
            tick(&mut state, &input);
        }
        assert_eq!(state.platform.x, 40.0);
        assert_eq!(state.ball.position.x, 40.0);
    }

    #[test]
    fn test_both_directions_cancel() {
        let mut state = GameState::new(GameConfig::default(), 12345);
        let input = TickInput {
            move_left: true,
            move_right: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.platform.x, 0.0);

        let input = TickInput {
            move_left: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.platform.x, -8.0);
    }

    #[test]
    fn test_platform_clamped_at_right_edge() {
        let mut state = empty_state();
        state.platform.x = 162.0;
        let input = TickInput {
            move_right: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.platform.x, state.config.field_width / 2.0 - state.config.platform_width / 2.0);
    }

    #[test]
    fn test_centre_platform_hit_goes_straight_up() {
        let mut state = empty_state();
        free_ball(&mut state, Vec3::new(0.0, 15.0, 200.0), 90.0);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.ball.direction(), 270.0);
        assert!(state.alive);
    }

    #[test]
    fn test_platform_edge_hit_deflects_sixty_degrees() {
        let mut state = empty_state();
        free_ball(&mut state, Vec3::new(35.0, 15.0, 200.0), 90.0);
        tick(&mut state, &TickInput::default());
        assert!((state.ball.direction() - 330.0).abs() < 1e-3);
    }

    #[test]
    fn test_last_brick_gives_victory() {
        let mut state = empty_state();
        state.bricks.push(brick_at(500, 0.0, 0.0));
        free_ball(&mut state, Vec3::new(0.0, 15.0, 20.0), 270.0);

        tick(&mut state, &TickInput::default());

        assert!(state.victory);
        assert!(state.alive);
        assert_eq!(state.points, 10);
        assert_eq!(state.phase(), GamePhase::Won);
        assert!(state.events.contains(&GameEvent::Victory));
    }

    #[test]
    fn test_victory_only_when_collection_empty() {
        let mut state = empty_state();
        state.bricks.push(brick_at(500, 0.0, 0.0));
        state.bricks.push(brick_at(501, -120.0, -100.0));
        free_ball(&mut state, Vec3::new(0.0, 15.0, 20.0), 270.0);

        tick(&mut state, &TickInput::default());
        assert!(!state.victory);
        assert_eq!(state.remaining_bricks(), 1);
    }

    #[test]
    fn test_fast_side_hit_bounces_back() {
        let mut state = GameState::new(GameConfig::with_difficulty(Difficulty::Hard), 12345);
        state.bricks.clear();
        state.bricks.push(brick_at(500, 0.0, 0.0));
        state.bricks.push(brick_at(501, 40.0, 0.0));
        state.ball_paused = false;
        state.ball.position = Vec3::new(-27.5, 15.0, 0.0);
        state.ball.set_direction(10.0);
        assert_eq!(state.ball.speed, 6.0);

        tick(&mut state, &TickInput::default());

        assert!(!state.bricks[0].alive);
        assert!((state.ball.direction() - 170.0).abs() < 1e-3);
        assert!(state.ball.velocity().x < 0.0);

        for _ in 0..6 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.bricks[1].alive, "one side contact breaks one brick");
        assert!(state.ball.position.x < -27.5);
    }

    #[test]
    fn test_removed_brick_never_collides_again() {
        let mut state = empty_state();
        state.bricks.push(brick_at(500, 0.0, 0.0));
        state.bricks.push(brick_at(501, 160.0, -150.0));
        free_ball(&mut state, Vec3::new(0.0, 15.0, 20.0), 270.0);
        tick(&mut state, &TickInput::default());
        assert!(!state.bricks[0].alive);
        let points = state.points;

        // Drive the ball back through the dead brick
        free_ball(&mut state, Vec3::new(0.0, 15.0, 4.0), 270.0);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.points, points);
        assert_eq!(state.ball.direction(), 270.0);
        assert_eq!(state.bricks.len(), 2, "bricks are never compacted");
    }

    #[test]
    fn test_ball_past_platform_is_defeat() {
        let mut state = empty_state();
        state.bricks.push(brick_at(500, 0.0, 0.0));
        // Still overlapping the platform after moving; must not be deflected
        free_ball(&mut state, Vec3::new(0.0, 15.0, 224.0), 90.0);

        tick(&mut state, &TickInput::default());

        assert!(!state.alive);
        assert!(!state.victory);
        assert_eq!(state.phase(), GamePhase::Lost);
        assert_eq!(state.ball.direction(), 90.0);
        assert_eq!(state.events, vec![GameEvent::Defeat]);
    }

    #[test]
    fn test_terminal_tick_is_noop() {
        let mut state = empty_state();
        state.alive = false;
        let before_ticks = state.time_ticks;
        let input = TickInput {
            move_right: true,
            launch: true,
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.platform.x, 0.0);
        assert_eq!(state.time_ticks, before_ticks);
        assert!(!state.paused);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut state = empty_state();
        free_ball(&mut state, Vec3::new(0.0, 15.0, 0.0), 270.0);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase(), GamePhase::Paused);
        let z = state.ball.position.z;

        let held = TickInput {
            move_left: true,
            ..Default::default()
        };
        tick(&mut state, &held);
        assert_eq!(state.ball.position.z, z);
        assert_eq!(state.platform.x, 0.0);

        tick(&mut state, &pause);
        assert_eq!(state.phase(), GamePhase::Playing);
        assert!(state.ball.position.z < z);
    }

    #[test]
    fn test_right_wall_reflects_once_then_nudges() {
        let mut state = empty_state();
        free_ball(&mut state, Vec3::new(197.0, 15.0, 0.0), 0.0);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.ball.direction(), 180.0);
        assert_eq!(state.wall_hits[WallSide::Right.index()], 1);

        // x = 197 after moving back 4 units: still touching the wall
        tick(&mut state, &TickInput::default());
        assert_eq!(state.ball.direction(), 180.0);
        assert_eq!(state.ball.position.x, 195.0);

        // Clear of the wall: streak resets
        tick(&mut state, &TickInput::default());
        assert_eq!(state.wall_hits, [0, 0, 0]);
    }

    #[test]
    fn test_top_wall_reflection() {
        let mut state = empty_state();
        free_ball(&mut state, Vec3::new(0.0, 15.0, -197.0), 300.0);
        tick(&mut state, &TickInput::default());
        assert!((state.ball.direction() - 60.0).abs() < 1e-3);
        assert!(state.events.contains(&GameEvent::WallHit {
            side: WallSide::Top,
            reflected: true
        }));
    }

    #[test]
    fn test_special_caught_grants_charges() {
        let mut state = empty_state();
        let id = state.next_entity_id();
        state
            .specials
            .push(SpecialObject::new(id, 99, Vec3::new(0.0, 15.0, 200.0), 5.0));

        tick(&mut state, &TickInput::default());

        assert!(state.specials.is_empty());
        assert_eq!(state.charges, state.config.charges_per_catch);
        assert!(state.events.contains(&GameEvent::SpecialCaught {
            id,
            charges: state.config.charges_per_catch
        }));
    }

    #[test]
    fn test_special_missed_is_removed() {
        let mut state = empty_state();
        let keep = state.next_entity_id();
        let miss = state.next_entity_id();
        state
            .specials
            .push(SpecialObject::new(keep, 98, Vec3::new(-150.0, 15.0, 0.0), 5.0));
        state
            .specials
            .push(SpecialObject::new(miss, 99, Vec3::new(150.0, 15.0, 224.0), 5.0));

        tick(&mut state, &TickInput::default());

        assert_eq!(state.specials.len(), 1);
        assert_eq!(state.specials[0].id, keep);
        assert_eq!(state.specials[0].position.z, 5.0);
        assert_eq!(state.charges, 0);
        assert!(state.events.contains(&GameEvent::SpecialMissed { id: miss }));
    }

    #[test]
    fn test_charges_are_capped() {
        let mut state = empty_state();
        state.charges = state.config.max_charges - 1;
        let id = state.next_entity_id();
        state
            .specials
            .push(SpecialObject::new(id, 99, Vec3::new(0.0, 15.0, 200.0), 5.0));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.charges, state.config.max_charges);
    }

    #[test]
    fn test_charge_reattaches_ball_on_platform_hit() {
        let mut state = empty_state();
        state.charges = 1;
        free_ball(&mut state, Vec3::new(0.0, 15.0, 200.0), 90.0);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase(), GamePhase::Serve);
        assert_eq!(state.charges, 0);

        let launch = TickInput {
            launch: true,
            ..Default::default()
        };
        tick(&mut state, &launch);
        assert_eq!(state.phase(), GamePhase::Playing);
        assert_eq!(state.ball.direction(), 270.0);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(GameConfig::default(), 99999);
        let mut state2 = GameState::new(GameConfig::default(), 99999);

        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state1, &input);
            tick(&mut state2, &input);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.points, state2.points);
        assert_eq!(state1.ball.position, state2.ball.position);
        assert_eq!(state1.remaining_bricks(), state2.remaining_bricks());
    }

    #[test]
    fn test_autopilot_launches_and_scores() {
        let mut state = GameState::new(GameConfig::default(), 2024);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..2000 {
            tick(&mut state, &input);
            if state.is_terminal() {
                break;
            }
        }
        assert!(state.points > 0, "autopilot should break at least one brick");
        assert!((0.0..360.0).contains(&state.ball.direction()));
    }

    #[test]
    fn test_peek_collision() {
        let mut state = empty_state();
        assert_eq!(peek_collision(&state), None, "attached ball never collides");
        free_ball(&mut state, Vec3::new(198.0, 15.0, 0.0), 0.0);
        assert_eq!(peek_collision(&state), Some(Collision::Wall(WallSide::Right)));
    }
}
