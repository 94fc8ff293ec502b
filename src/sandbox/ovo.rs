//! Flying collectibles crossing the ground

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sim::aabb::Aabb;
use crate::sim::state::EntityId;

pub const OVO_RADIUS: f32 = 2.0;
pub const PATH_START_X: f32 = 150.0;
pub const PATH_END_X: f32 = -150.0;
/// Lane z range, [min, min + span)
pub const LANE_Z_MIN: f32 = -148.0;
pub const LANE_Z_SPAN: f32 = 298.0;
pub const FLIGHT_HEIGHT_SPAN: f32 = 10.0;
/// Seconds to cross the ground, [min, max)
pub const CROSSING_SECS_MIN: f32 = 3.0;
pub const CROSSING_SECS_MAX: f32 = 11.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OvoKind {
    /// Costs energy on contact
    Bad,
    /// Grants points and energy on contact
    Good,
}

#[derive(Debug, Clone)]
pub struct Ovo {
    pub id: EntityId,
    pub kind: OvoKind,
    pub radius: f32,
    pub position: Vec3,
    /// Cleared when the ovo touches the robot, restored on the next lap
    pub enabled: bool,
    crossing_secs: f32,
    elapsed: f32,
    laps: u32,
}

impl Ovo {
    pub fn new<R: Rng>(id: EntityId, kind: OvoKind, rng: &mut R) -> Self {
        let mut ovo = Self {
            id,
            kind,
            radius: OVO_RADIUS,
            position: Vec3::new(PATH_START_X, 0.0, 0.0),
            enabled: true,
            crossing_secs: rng.random_range(CROSSING_SECS_MIN..CROSSING_SECS_MAX),
            elapsed: 0.0,
            laps: 0,
        };
        ovo.pick_lane(rng);
        ovo
    }

    /// Random lane and flight height for a new crossing
    fn pick_lane<R: Rng>(&mut self, rng: &mut R) {
        self.position.y = (rng.random::<f32>() * FLIGHT_HEIGHT_SPAN + self.radius).floor();
        self.position.z = (rng.random::<f32>() * LANE_Z_SPAN + LANE_Z_MIN).floor();
        self.position.x = PATH_START_X;
    }

    pub fn crossing_secs(&self) -> f32 {
        self.crossing_secs
    }

    pub fn laps(&self) -> u32 {
        self.laps
    }

    /// Progress through the current crossing in [0, 1)
    pub fn progress(&self) -> f32 {
        self.elapsed / self.crossing_secs
    }

    /// Advance along the path by `dt` seconds. Crossings repeat forever;
    /// each new one re-enables the ovo on a fresh lane.
    pub fn advance<R: Rng>(&mut self, dt: f32, rng: &mut R) {
        if !(dt > 0.0) {
            return;
        }
        self.elapsed += dt;
        if self.elapsed >= self.crossing_secs {
            self.elapsed %= self.crossing_secs;
            self.laps += 1;
            self.enabled = true;
            self.pick_lane(rng);
        }
        self.position.x = ease_in_quad(PATH_START_X, PATH_END_X, self.progress());
    }

    pub fn collider(&self) -> Aabb {
        Aabb::from_sphere(self.position, self.radius)
    }
}

/// Quadratic ease-in between `start` and `end`
pub fn ease_in_quad(start: f32, end: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    start + (end - start) * t * t
}
