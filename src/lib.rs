//! arcade3d - Breakout and robot-sandbox demos on a 3D scene graph
//!
//! Core modules:
//! - `sim`: Deterministic breakout simulation (collisions, entity lifecycle, game state)
//! - `sandbox`: Robot-control sandbox with flying collectibles
//! - `scene`: Narrow interface to the external renderer/scene graph
//! - `config`: Data-driven game parameters and difficulty tiers

pub mod config;
pub mod sandbox;
pub mod scene;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{ConfigError, Difficulty, GameConfig};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Nominal frame rate used to convert wall-clock limits into ticks
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Game field (floor) dimensions
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_DEPTH: f32 = 400.0;
    pub const WALL_THICKNESS: f32 = 20.0;
    pub const WALL_HEIGHT: f32 = 40.0;

    /// Platform defaults
    pub const PLATFORM_WIDTH: f32 = 70.0;
    pub const PLATFORM_HEIGHT: f32 = 20.0;
    pub const PLATFORM_DEPTH: f32 = 20.0;
    /// Units per tick
    pub const PLATFORM_SPEED: f32 = 8.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 5.0;
    /// Distance between the attached ball and the field's near edge
    pub const BALL_ATTACH_OFFSET: f32 = 30.0;
    /// Launch direction range (degrees), pointing away from the platform
    pub const LAUNCH_ANGLE_MIN: f32 = 240.0;
    pub const LAUNCH_ANGLE_MAX: f32 = 315.0;

    /// Platform deflection: normal angle and max deviation at the platform edge
    pub const PLATFORM_NORMAL_ANGLE: f32 = 270.0;
    pub const MAX_DEFLECTION: f32 = 60.0;

    /// Brick grid
    pub const BRICK_COLUMNS: u32 = 10;
    pub const BRICK_DEPTH: f32 = 20.0;
    pub const BRICK_HEIGHT: f32 = 35.0;
    pub const BRICK_COLLIDER_MARGIN: f32 = 2.0;
    pub const NORMAL_BRICK_POINTS: u32 = 10;
    pub const SPECIAL_BRICK_POINTS: u32 = 30;

    /// Falling power-up defaults
    pub const SPECIAL_SPEED: f32 = 5.0;
    /// Torus ring radius + tube radius
    pub const SPECIAL_HALF_SIZE: f32 = 13.0;
    pub const SPECIAL_HALF_HEIGHT: f32 = 3.0;
    pub const CHARGES_PER_CATCH: u32 = 3;
    pub const MAX_CHARGES: u32 = 5;

    /// Countdown for the hardest tier (seconds)
    pub const HARD_TIME_LIMIT_SECS: u32 = 120;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit direction on the ground plane (x, z) for a heading in degrees
#[inline]
pub fn heading_to_vector(degrees: f32) -> Vec3 {
    let radians = degrees.to_radians();
    Vec3::new(radians.cos(), 0.0, radians.sin())
}
