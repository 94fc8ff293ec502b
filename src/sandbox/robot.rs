//! Jointed robot figure

use glam::Vec3;

use crate::sim::aabb::Aabb;
use crate::sim::state::EntityId;

pub const ROBOT_HEIGHT: f32 = 30.0;
pub const ROBOT_WIDTH: f32 = 45.0;

/// Share of the nominal height taken by each part
pub const LEG_RATIO: f32 = 0.7619;
pub const BODY_RATIO: f32 = 0.6667;
pub const HEAD_RATIO: f32 = 0.1428;

pub const HEAD_ANGLE_MIN: f32 = -80.0;
pub const HEAD_ANGLE_MAX: f32 = 80.0;
pub const BODY_ANGLE_MIN: f32 = -45.0;
pub const BODY_ANGLE_MAX: f32 = 30.0;
pub const LEG_SCALE_MIN: f32 = 1.0;
pub const LEG_SCALE_MAX: f32 = 1.2;

pub const MAX_ENERGY: i32 = 100;

/// Where the robot stands on the ground
pub const ROBOT_POSITION: Vec3 = Vec3::new(-100.0, 0.0, 0.0);

#[derive(Debug, Clone)]
pub struct Robot {
    pub id: EntityId,
    pub position: Vec3,
    pub height: f32,
    pub width: f32,
    head_rotation: f32,
    body_rotation: f32,
    leg_scale: f32,
    energy: i32,
    points: u32,
}

impl Robot {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            position: ROBOT_POSITION,
            height: ROBOT_HEIGHT,
            width: ROBOT_WIDTH,
            head_rotation: 0.0,
            body_rotation: 0.0,
            leg_scale: LEG_SCALE_MIN,
            energy: MAX_ENERGY,
            points: 0,
        }
    }

    pub fn head_rotation(&self) -> f32 {
        self.head_rotation
    }

    pub fn body_rotation(&self) -> f32 {
        self.body_rotation
    }

    pub fn leg_scale(&self) -> f32 {
        self.leg_scale
    }

    pub fn energy(&self) -> i32 {
        self.energy
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn is_dead(&self) -> bool {
        self.energy <= 0
    }

    /// Degrees, clamped to the neck's range
    pub fn set_head_rotation(&mut self, degrees: f32) {
        self.head_rotation = clamp_or(degrees, HEAD_ANGLE_MIN, HEAD_ANGLE_MAX, 0.0);
    }

    /// Degrees, clamped to the hip's range
    pub fn set_body_rotation(&mut self, degrees: f32) {
        self.body_rotation = clamp_or(degrees, BODY_ANGLE_MIN, BODY_ANGLE_MAX, 0.0);
    }

    pub fn set_leg_scale(&mut self, scale: f32) {
        self.leg_scale = clamp_or(scale, LEG_SCALE_MIN, LEG_SCALE_MAX, LEG_SCALE_MIN);
    }

    pub fn leg_height(&self) -> f32 {
        self.height * LEG_RATIO * self.leg_scale
    }

    pub fn body_height(&self) -> f32 {
        self.height * BODY_RATIO
    }

    pub fn head_height(&self) -> f32 {
        self.height * HEAD_RATIO
    }

    /// Ground-to-top height with the current leg extension
    pub fn total_height(&self) -> f32 {
        self.leg_height() + self.body_height() + self.head_height()
    }

    /// Box around the whole figure. The robot faces +x, so its width runs
    /// along z.
    pub fn collider(&self) -> Aabb {
        let depth = self.width / 3.0;
        let half = Vec3::new(depth / 2.0, self.total_height() / 2.0, self.width / 2.0);
        let center = self.position + Vec3::new(0.0, half.y, 0.0);
        Aabb::from_center_half_extents(center, half)
    }

    pub fn add_points(&mut self, points: u32) {
        self.points += points;
    }

    /// Never exceeds the maximum; a dead robot stays dead
    pub fn add_energy(&mut self, amount: i32) {
        if !self.is_dead() {
            self.energy = (self.energy + amount).min(MAX_ENERGY);
        }
    }

    pub fn subtract_energy(&mut self, amount: i32) {
        self.energy -= amount;
        if self.is_dead() {
            log::info!("Robot out of energy with {} points", self.points);
        }
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() { fallback } else { value.clamp(min, max) }
}
