//! Deterministic breakout simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, fixed per-tick displacements
//! - Seeded RNG only
//! - Stable iteration order (insertion order)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod collision;
pub mod layout;
pub mod state;
pub mod tick;

pub use aabb::Aabb;
pub use collision::{
    BrickHit, Collision, classify_brick_hit, detect_collision, platform_deflection,
    reflect_direction, resolve_collision,
};
pub use layout::generate_bricks;
pub use state::{
    Ball, Brick, BrickKind, Countdown, EntityId, GameEvent, GameField, GamePhase, GameState,
    Platform, SpecialObject, Wall, WallSide,
};
pub use tick::{TickInput, peek_collision, tick};
